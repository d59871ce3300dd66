use std::sync::{Arc, Mutex};

use axum::Router;
use axum::routing::{get, post};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::handlers;
use crate::config::InvitationConfig;
use crate::{AccountProvisioner, Authenticator, InvitationRepository};

/// Token generator shared by every create request served from one state.
pub type SharedRng = Arc<Mutex<StdRng>>;

#[derive(Clone)]
pub struct AppState<I, P, A> {
    pub invitation_repo: I,
    pub provisioner: P,
    pub authenticator: A,
    pub config: InvitationConfig,
    pub rng: SharedRng,
}

impl<I, P, A> AppState<I, P, A> {
    /// Default config and an entropy-seeded generator.
    pub fn new(invitation_repo: I, provisioner: P, authenticator: A) -> Self {
        Self {
            invitation_repo,
            provisioner,
            authenticator,
            config: InvitationConfig::default(),
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }
}

/// `POST /` creates, `GET|PUT|DELETE /{token}` fetch, activate and revoke.
///
/// Mount under a prefix such as `/rest/invitations`.
pub fn invitation_routes<I, P, A>() -> Router<AppState<I, P, A>>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: AccountProvisioner + Clone + Send + Sync + 'static,
    A: Authenticator + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", post(handlers::create_invitation::<I, P, A>))
        .route(
            "/{token}",
            get(handlers::get_invitation::<I, P, A>)
                .put(handlers::activate_invitation::<I, P, A>)
                .delete(handlers::revoke_invitation::<I, P, A>),
        )
}
