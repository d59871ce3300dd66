//! HTTP handlers for the invitation resource.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::error::AppError;
use super::middleware::{ApiJson, RequestCaller};
use super::routes::AppState;
use crate::actions::{
    ActivateInvitationAction, CreateInvitationAction, CreateInvitationInput, GetInvitationAction,
    RevokeInvitationAction,
};
use crate::api::{CreateInvitationRequest, InvitationResponse, MessageResponse};
use crate::{AccountProvisioner, ActivationData, Authenticator, InvitationRepository};

/// Fetch a pending invitation by token.
///
/// GET /{token}
pub async fn get_invitation<I, P, A>(
    State(state): State<AppState<I, P, A>>,
    Path(token): Path<String>,
) -> Result<Json<InvitationResponse>, AppError>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
{
    let action = GetInvitationAction::new(state.invitation_repo);
    let invitation = action.execute(&token).await?;

    Ok(Json(InvitationResponse::from(invitation)))
}

/// Invite an email address. Requires an authenticated caller.
///
/// POST /
pub async fn create_invitation<I, P, A>(
    State(state): State<AppState<I, P, A>>,
    RequestCaller(caller): RequestCaller,
    ApiJson(body): ApiJson<CreateInvitationRequest>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
    A: Authenticator + Clone + Send + Sync + 'static,
{
    let action = CreateInvitationAction::with_shared_rng(state.invitation_repo, state.rng)
        .with_config(state.config);
    let input = CreateInvitationInput {
        email: body.email,
        organization: body.organization,
    };

    let invitation = action.execute(&caller, input).await?;

    Ok((StatusCode::CREATED, Json(InvitationResponse::from(invitation))))
}

/// Activate an invitation with account details.
///
/// PUT /{token}
pub async fn activate_invitation<I, P, A>(
    State(state): State<AppState<I, P, A>>,
    Path(token): Path<String>,
    ApiJson(body): ApiJson<ActivationData>,
) -> Result<Json<MessageResponse>, AppError>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: AccountProvisioner + Clone + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
{
    let pending = GetInvitationAction::new(state.invitation_repo.clone())
        .execute(&token)
        .await?;

    let action = ActivateInvitationAction::new(state.invitation_repo, state.provisioner);
    action.execute(&pending, body).await?;

    Ok(Json(MessageResponse {
        message: "Invitation activated".to_owned(),
    }))
}

/// Revoke a pending invitation. Requires an authenticated caller.
///
/// DELETE /{token}
pub async fn revoke_invitation<I, P, A>(
    State(state): State<AppState<I, P, A>>,
    RequestCaller(caller): RequestCaller,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, AppError>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
    A: Authenticator + Clone + Send + Sync + 'static,
{
    let action = RevokeInvitationAction::new(state.invitation_repo);
    action.execute(&caller, &token).await?;

    Ok(Json(MessageResponse {
        message: "Invitation revoked".to_owned(),
    }))
}
