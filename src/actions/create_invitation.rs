use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{CryptoRng, RngCore, SeedableRng};

use crate::config::InvitationConfig;
use crate::crypto::generate_invitation_token;
use crate::repository::{InternalKey, Invitation, InvitationRepository};
use crate::validators::validate_email;
use crate::{Caller, InviteError};

/// Input data for creating an invitation.
#[derive(Debug, Clone)]
pub struct CreateInvitationInput {
    pub email: String,
    pub organization: Option<String>,
}

/// Action to invite an email address to sign up.
///
/// This action:
/// 1. Refuses unauthenticated callers
/// 2. Checks there is no pending invitation for the email
/// 3. Assigns an internal key and derives the activation token
/// 4. Persists the invitation
///
/// The check in step 2 is best-effort: two concurrent calls can both pass
/// it. The store's own uniqueness on email decides the race, and the loser
/// also gets `DuplicateInvitation`.
///
/// The RNG sits behind an `Arc<Mutex<_>>` so that one generator can be
/// shared by every action built for a server, see [`with_shared_rng`].
///
/// [`with_shared_rng`]: CreateInvitationAction::with_shared_rng
pub struct CreateInvitationAction<I, G = StdRng> {
    invitation_repo: I,
    rng: Arc<Mutex<G>>,
    config: InvitationConfig,
}

impl<I: InvitationRepository> CreateInvitationAction<I> {
    /// Creates the action with an entropy-seeded `StdRng`.
    pub fn new(invitation_repo: I) -> Self {
        Self::with_rng(invitation_repo, StdRng::from_entropy())
    }
}

impl<I, G> CreateInvitationAction<I, G>
where
    I: InvitationRepository,
    G: RngCore + CryptoRng + Send,
{
    pub fn with_rng(invitation_repo: I, rng: G) -> Self {
        Self::with_shared_rng(invitation_repo, Arc::new(Mutex::new(rng)))
    }

    pub fn with_shared_rng(invitation_repo: I, rng: Arc<Mutex<G>>) -> Self {
        Self {
            invitation_repo,
            rng,
            config: InvitationConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: InvitationConfig) -> Self {
        self.config = config;
        self
    }

    /// Creates a pending invitation for `input.email`.
    ///
    /// # Returns
    ///
    /// - `Ok(invitation)` - Invitation persisted, `token` ready for delivery
    /// - `Err(InviteError::Unauthorized)` - Caller is not authenticated
    /// - `Err(InviteError::InvalidEmail)` - Email failed validation
    /// - `Err(InviteError::DuplicateInvitation)` - Email already has a pending invitation
    /// - `Err(InviteError::StoreFailure(_))` - Store errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_invitation", skip_all, err)
    )]
    pub async fn execute(
        &self,
        caller: &Caller,
        input: CreateInvitationInput,
    ) -> Result<Invitation, InviteError> {
        let Some(identity) = caller.identity() else {
            log::warn!(
                target: "vestibule",
                "msg=\"invitation refused\", reason=\"unauthenticated\""
            );
            return Err(InviteError::Unauthorized);
        };

        if self.config.validate_email {
            validate_email(&input.email)?;
        }

        if self
            .invitation_repo
            .find_by_email(&input.email)
            .await?
            .is_some()
        {
            return Err(InviteError::DuplicateInvitation);
        }

        let (key, token) = {
            // generator state stays valid if another holder panicked
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            let key = InternalKey::generate(&mut *rng);
            let token = generate_invitation_token(&mut *rng, &key, &input.email);
            (key, token)
        };

        let invitation = Invitation {
            key,
            token,
            email: input.email,
            organization: input.organization,
            created_at: Utc::now(),
        };

        self.invitation_repo.insert(&invitation).await?;

        log::info!(
            target: "vestibule",
            "msg=\"invitation created\", key={}, email=\"{}\", invited_by=\"{}\"",
            invitation.key,
            invitation.email,
            identity.subject
        );

        Ok(invitation)
    }
}
