use crate::repository::{Invitation, InvitationRepository};
use crate::{Caller, InviteError};

/// Administrative removal of a pending invitation before it is used.
pub struct RevokeInvitationAction<I: InvitationRepository> {
    invitation_repo: I,
}

impl<I: InvitationRepository> RevokeInvitationAction<I> {
    pub fn new(invitation_repo: I) -> Self {
        Self { invitation_repo }
    }

    /// Deletes the invitation with `token` and returns it.
    ///
    /// # Returns
    ///
    /// - `Ok(invitation)` - Invitation removed; its token no longer activates
    /// - `Err(InviteError::Unauthorized)` - Caller is not authenticated
    /// - `Err(InviteError::NotFound)` - No pending invitation with this token
    /// - `Err(InviteError::StoreFailure(_))` - Store errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "revoke_invitation", skip_all, err)
    )]
    pub async fn execute(&self, caller: &Caller, token: &str) -> Result<Invitation, InviteError> {
        let identity = caller.identity().ok_or(InviteError::Unauthorized)?;

        let invitation = self
            .invitation_repo
            .take_by_token(token)
            .await?
            .ok_or(InviteError::NotFound)?;

        log::info!(
            target: "vestibule",
            "msg=\"invitation revoked\", key={}, email=\"{}\", revoked_by=\"{}\"",
            invitation.key,
            invitation.email,
            identity.subject
        );

        Ok(invitation)
    }
}
