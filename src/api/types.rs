use serde::{Deserialize, Serialize};

use crate::{Invitation, InviteError};

// Request DTOs

#[derive(Debug, Deserialize)]
pub struct CreateInvitationRequest {
    pub email: String,
    #[serde(default)]
    pub organization: Option<String>,
}

// Response DTOs

/// Public view of an invitation. The token is exposed as `id`; the internal
/// key never leaves the server.
#[derive(Debug, Serialize)]
pub struct InvitationResponse {
    pub id: String,
    pub email: String,
    pub organization: Option<String>,
}

impl From<Invitation> for InvitationResponse {
    fn from(invitation: Invitation) -> Self {
        InvitationResponse {
            id: invitation.token,
            email: invitation.email,
            organization: invitation.organization,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<InviteError> for ErrorResponse {
    fn from(err: InviteError) -> Self {
        let code = match &err {
            InviteError::NotFound => "NOT_FOUND",
            InviteError::DuplicateInvitation => "DUPLICATE_INVITATION",
            InviteError::Unauthorized => "UNAUTHORIZED",
            InviteError::AccountCreationFailed(_) => "ACCOUNT_CREATION_FAILED",
            InviteError::StoreFailure(_) => "STORE_FAILURE",
            InviteError::InvalidEmail => "INVALID_EMAIL",
            InviteError::MalformedRequest(_) => "MALFORMED_REQUEST",
        };

        // store details stay in the logs
        let error = match &err {
            InviteError::StoreFailure(_) => "Internal server error".to_owned(),
            _ => err.to_string(),
        };

        ErrorResponse {
            error,
            code: code.to_owned(),
        }
    }
}
