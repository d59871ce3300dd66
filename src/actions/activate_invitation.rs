use crate::provisioning::{AccountProvisioner, NewAccountRequest};
use crate::repository::{ActivationData, Invitation, InvitationRepository};
use crate::InviteError;

/// Action to turn a pending invitation into an account.
///
/// This action:
/// 1. Claims the invitation by atomically removing it from the store
/// 2. Provisions an account under the invitation's email
/// 3. On provisioning failure, puts the invitation back so it can be retried
///
/// Claiming before provisioning means two concurrent activations of one
/// token cannot both reach the provisioner; the second sees `NotFound`.
///
/// While the claim is held the email has no pending invitation, so a
/// concurrent create for it can succeed. If provisioning then fails, the
/// newer invitation wins: the claimed one is dropped and the caller still
/// receives the provisioning error.
pub struct ActivateInvitationAction<I, P>
where
    I: InvitationRepository,
    P: AccountProvisioner,
{
    invitation_repo: I,
    provisioner: P,
}

impl<I: InvitationRepository, P: AccountProvisioner> ActivateInvitationAction<I, P> {
    pub fn new(invitation_repo: I, provisioner: P) -> Self {
        Self {
            invitation_repo,
            provisioner,
        }
    }

    /// Activates `pending` with the caller-submitted account details.
    ///
    /// `pending` is only used for its token. The account email is taken from
    /// the stored invitation, never from the caller; `submitted` contributes
    /// the organization and password.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Account created, invitation retired
    /// - `Err(InviteError::NotFound)` - Token already activated, revoked, or
    ///   claimed by a concurrent activation
    /// - `Err(InviteError::AccountCreationFailed(_))` - Provisioner rejected the data;
    ///   the invitation is pending again unless a newer one replaced it
    /// - `Err(InviteError::StoreFailure(_))` - Store errors, including failure to
    ///   put the invitation back after a rejected provisioning
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "activate_invitation", skip_all, err)
    )]
    pub async fn execute(
        &self,
        pending: &Invitation,
        submitted: ActivationData,
    ) -> Result<(), InviteError> {
        let claimed = self
            .invitation_repo
            .take_by_token(&pending.token)
            .await?
            .ok_or(InviteError::NotFound)?;

        let request = NewAccountRequest {
            email: claimed.email.clone(),
            organization: submitted.organization,
            password: submitted.password,
        };

        let err = match self.provisioner.provision(request).await {
            Ok(account) => {
                log::info!(
                    target: "vestibule",
                    "msg=\"invitation activated\", key={}, account_id={}, email=\"{}\"",
                    claimed.key,
                    account.id,
                    account.email
                );
                return Ok(());
            }
            Err(err) => err,
        };

        match self.invitation_repo.insert(&claimed).await {
            Ok(()) => {
                log::warn!(
                    target: "vestibule",
                    "msg=\"activation rejected\", key={}, error=\"{err}\"",
                    claimed.key
                );
            }
            Err(InviteError::DuplicateInvitation) => {
                log::warn!(
                    target: "vestibule",
                    "msg=\"activation rejected, invitation superseded\", key={}, email=\"{}\", error=\"{err}\"",
                    claimed.key,
                    claimed.email
                );
            }
            Err(restore_err) => {
                log::error!(
                    target: "vestibule",
                    "msg=\"failed to restore invitation after rejected activation\", key={}, email=\"{}\", error=\"{restore_err}\", cause=\"{err}\"",
                    claimed.key,
                    claimed.email
                );
                return Err(InviteError::StoreFailure(format!(
                    "invitation could not be restored after failed activation: {restore_err}"
                )));
            }
        }

        Err(err)
    }
}
