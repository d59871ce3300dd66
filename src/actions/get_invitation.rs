use crate::InviteError;
use crate::repository::{Invitation, InvitationRepository};

/// Looks up a pending invitation by its activation token.
pub struct GetInvitationAction<I: InvitationRepository> {
    invitation_repo: I,
}

impl<I: InvitationRepository> GetInvitationAction<I> {
    pub fn new(invitation_repo: I) -> Self {
        Self { invitation_repo }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "get_invitation", skip_all, err)
    )]
    pub async fn execute(&self, token: &str) -> Result<Invitation, InviteError> {
        self.invitation_repo
            .find_by_token(token)
            .await?
            .ok_or(InviteError::NotFound)
    }
}
