//! Account provisioning, the collaborator that turns an activated invitation
//! into a real account.

use async_trait::async_trait;

use crate::crypto::{Argon2Hasher, PasswordHasher};
use crate::repository::{Account, AccountRepository, NewAccount};
use crate::{InviteError, SecretString};

/// Everything needed to create an account from an invitation.
#[derive(Debug, Clone)]
pub struct NewAccountRequest {
    pub email: String,
    pub organization: String,
    pub password: SecretString,
}

/// Creates persisted accounts.
///
/// Implementations own password hashing. A failure must leave no account
/// behind, and a second request for an email that already has an account
/// must be rejected.
#[async_trait]
pub trait AccountProvisioner: Send + Sync {
    async fn provision(&self, request: NewAccountRequest) -> Result<Account, InviteError>;
}

/// Provisioner that hashes the password and stores the account in an
/// [`AccountRepository`].
#[derive(Clone)]
pub struct RepositoryAccountProvisioner<A, H = Argon2Hasher> {
    accounts: A,
    hasher: H,
}

impl<A: AccountRepository> RepositoryAccountProvisioner<A> {
    pub fn new(accounts: A) -> Self {
        Self {
            accounts,
            hasher: Argon2Hasher::default(),
        }
    }
}

impl<A: AccountRepository, H: PasswordHasher> RepositoryAccountProvisioner<A, H> {
    pub fn with_hasher(accounts: A, hasher: H) -> Self {
        Self { accounts, hasher }
    }
}

#[async_trait]
impl<A, H> AccountProvisioner for RepositoryAccountProvisioner<A, H>
where
    A: AccountRepository,
    H: PasswordHasher,
{
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "provision_account", skip_all, err)
    )]
    async fn provision(&self, request: NewAccountRequest) -> Result<Account, InviteError> {
        if request.password.is_empty() {
            return Err(InviteError::AccountCreationFailed(
                "password cannot be empty".to_owned(),
            ));
        }

        if self.accounts.find_by_email(&request.email).await?.is_some() {
            return Err(InviteError::AccountCreationFailed(
                "account already exists for this email".to_owned(),
            ));
        }

        let hashed_password = self
            .hasher
            .hash(request.password.expose_secret())
            .map_err(|_| InviteError::AccountCreationFailed("failed to hash password".to_owned()))?;

        let account = self
            .accounts
            .create(NewAccount {
                email: request.email,
                organization: request.organization,
                hashed_password,
            })
            .await?;

        log::info!(
            target: "vestibule",
            "msg=\"account provisioned\", account_id={}, email=\"{}\"",
            account.id,
            account.email
        );

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockAccountRepository;

    fn provisioner(repo: MockAccountRepository) -> RepositoryAccountProvisioner<MockAccountRepository> {
        RepositoryAccountProvisioner::with_hasher(repo, Argon2Hasher::new(1024, 1, 1))
    }

    fn request(email: &str, password: &str) -> NewAccountRequest {
        NewAccountRequest {
            email: email.to_owned(),
            organization: "Acme".to_owned(),
            password: SecretString::new(password),
        }
    }

    #[tokio::test]
    async fn test_provision_hashes_password() {
        let repo = MockAccountRepository::new();
        let account = provisioner(repo.clone())
            .provision(request("alice@example.com", "p@ss"))
            .await
            .unwrap();

        assert_eq!(account.email, "alice@example.com");
        assert_eq!(account.organization, "Acme");
        assert_ne!(account.hashed_password, "p@ss");
        assert!(
            Argon2Hasher::default()
                .verify("p@ss", &account.hashed_password)
                .unwrap()
        );
        assert_eq!(repo.accounts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_provision_rejects_existing_email() {
        let repo = MockAccountRepository::new();
        let provisioner = provisioner(repo.clone());
        provisioner
            .provision(request("alice@example.com", "p@ss"))
            .await
            .unwrap();

        let result = provisioner
            .provision(request("alice@example.com", "other"))
            .await;
        assert!(matches!(result, Err(InviteError::AccountCreationFailed(_))));
        assert_eq!(repo.accounts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_provision_rejects_empty_password() {
        let repo = MockAccountRepository::new();
        let result = provisioner(repo.clone())
            .provision(request("alice@example.com", ""))
            .await;

        assert!(matches!(result, Err(InviteError::AccountCreationFailed(_))));
        assert!(repo.accounts.lock().unwrap().is_empty());
    }
}
