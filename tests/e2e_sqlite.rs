// these tests use #[serial] so each test gets a fresh in-memory database
// without interleaving with another test's setup.

//! End-to-end tests for the `SQLite` repositories.
//!
//! Run with: `cargo test --features sqlx_sqlite --test e2e_sqlite`

#![cfg(feature = "sqlx_sqlite")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serial_test::serial;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use vestibule::actions::{
    ActivateInvitationAction, CreateInvitationAction, CreateInvitationInput,
    RevokeInvitationAction,
};
use vestibule::config::VestibuleConfig;
use vestibule::crypto::{Argon2Hasher, generate_invitation_token};
use vestibule::sqlite::{
    SqliteAccountRepository, SqliteInvitationRepository, create_repositories, migrations,
};
use vestibule::{
    AccountRepository, ActivationData, Caller, CallerIdentity, InternalKey, Invitation,
    InvitationRepository, InviteError, RepositoryAccountProvisioner, SecretString,
};

async fn setup_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory SQLite database");

    migrations::run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

fn invitation(email: &str, seed: u64) -> Invitation {
    let mut rng = StdRng::seed_from_u64(seed);
    let key = InternalKey::generate(&mut rng);
    Invitation {
        token: generate_invitation_token(&mut rng, &key, email),
        key,
        email: email.to_owned(),
        organization: None,
        created_at: Utc::now(),
    }
}

fn admin() -> Caller {
    Caller::Authenticated(CallerIdentity::new("admin"))
}

fn provisioner(
    accounts: SqliteAccountRepository,
) -> RepositoryAccountProvisioner<SqliteAccountRepository, Argon2Hasher> {
    let config = VestibuleConfig::development();
    RepositoryAccountProvisioner::with_hasher(accounts, config.hashing.hasher())
}

fn input(email: &str) -> CreateInvitationInput {
    CreateInvitationInput {
        email: email.to_owned(),
        organization: Some("Acme".to_owned()),
    }
}

#[tokio::test]
#[serial]
async fn test_migrations_are_idempotent() {
    let pool = setup_db().await;
    migrations::run(&pool).await.expect("second run should be a no-op");
}

#[tokio::test]
#[serial]
async fn test_invitation_repository_crud() {
    let pool = setup_db().await;
    let repo = SqliteInvitationRepository::new(pool);

    let invitation = CreateInvitationAction::new(repo.clone())
        .execute(&admin(), input("alice@example.com"))
        .await
        .expect("Failed to create invitation");

    let by_token = repo
        .find_by_token(&invitation.token)
        .await
        .expect("Failed to query")
        .expect("Invitation not found");
    assert_eq!(by_token.key, invitation.key);
    assert_eq!(by_token.email, "alice@example.com");
    assert_eq!(by_token.organization.as_deref(), Some("Acme"));

    let by_email = repo
        .find_by_email("alice@example.com")
        .await
        .expect("Failed to query")
        .expect("Invitation not found");
    assert_eq!(by_email.token, invitation.token);

    repo.delete_by_token(&invitation.token)
        .await
        .expect("Failed to delete");
    assert!(repo.find_by_token(&invitation.token).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn test_unique_email_enforced_by_store() {
    let pool = setup_db().await;
    let repo = SqliteInvitationRepository::new(pool);

    let first = invitation("alice@example.com", 1);
    repo.insert(&first).await.expect("Failed to insert");

    // bypass the action's pre-check, as a racing creator would
    let second = invitation("alice@example.com", 2);
    assert_ne!(first.token, second.token);

    let result = repo.insert(&second).await;
    assert_eq!(result, Err(InviteError::DuplicateInvitation));
}

#[tokio::test]
#[serial]
async fn test_take_by_token_returns_row_once() {
    let pool = setup_db().await;
    let repo = SqliteInvitationRepository::new(pool);

    let invitation = invitation("alice@example.com", 1);
    repo.insert(&invitation).await.unwrap();

    let taken = repo.take_by_token(&invitation.token).await.unwrap();
    assert_eq!(taken.map(|i| i.key), Some(invitation.key));
    assert!(repo.take_by_token(&invitation.token).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn test_activation_against_sqlite() {
    let (invitations, accounts) = create_repositories(setup_db().await);

    let invitation = CreateInvitationAction::new(invitations.clone())
        .execute(&admin(), input("alice@example.com"))
        .await
        .unwrap();

    let action = ActivateInvitationAction::new(invitations.clone(), provisioner(accounts.clone()));

    action
        .execute(
            &invitation,
            ActivationData {
                organization: "Acme".to_owned(),
                password: SecretString::new("p@ss"),
            },
        )
        .await
        .expect("Activation failed");

    let account = accounts
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .expect("Account not created");
    assert!(account.id > 0);
    assert_eq!(account.organization, "Acme");
    assert!(account.hashed_password.starts_with("$argon2id$"));
    assert!(invitations.find_by_token(&invitation.token).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn test_failed_activation_keeps_invitation() {
    let (invitations, accounts) = create_repositories(setup_db().await);

    let invitation = CreateInvitationAction::new(invitations.clone())
        .execute(&admin(), input("alice@example.com"))
        .await
        .unwrap();

    let action = ActivateInvitationAction::new(invitations.clone(), provisioner(accounts.clone()));

    let result = action
        .execute(
            &invitation,
            ActivationData {
                organization: "Acme".to_owned(),
                password: SecretString::new(""),
            },
        )
        .await;
    assert!(matches!(result, Err(InviteError::AccountCreationFailed(_))));

    let pending = invitations
        .find_by_token(&invitation.token)
        .await
        .unwrap()
        .expect("Invitation should still be pending");
    assert_eq!(pending.key, invitation.key);
    assert!(accounts.find_by_email("alice@example.com").await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn test_revoke_against_sqlite() {
    let pool = setup_db().await;
    let repo = SqliteInvitationRepository::new(pool);

    let invitation = CreateInvitationAction::new(repo.clone())
        .execute(&admin(), input("alice@example.com"))
        .await
        .unwrap();

    let action = RevokeInvitationAction::new(repo.clone());
    action.execute(&admin(), &invitation.token).await.unwrap();

    assert!(repo.find_by_email("alice@example.com").await.unwrap().is_none());
    assert_eq!(
        action.execute(&admin(), &invitation.token).await,
        Err(InviteError::NotFound)
    );
}

#[tokio::test]
#[serial]
async fn test_second_activation_against_sqlite_is_not_found() {
    let (invitations, accounts) = create_repositories(setup_db().await);

    let invitation = CreateInvitationAction::new(invitations.clone())
        .execute(&admin(), input("alice@example.com"))
        .await
        .unwrap();

    let action = ActivateInvitationAction::new(invitations, provisioner(accounts.clone()));
    let data = || ActivationData {
        organization: "Acme".to_owned(),
        password: SecretString::new("p@ss"),
    };

    action.execute(&invitation, data()).await.unwrap();
    assert_eq!(
        action.execute(&invitation, data()).await,
        Err(InviteError::NotFound)
    );
    assert!(accounts.find_by_email("alice@example.com").await.unwrap().is_some());
}
