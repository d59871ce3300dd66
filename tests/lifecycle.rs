//! End-to-end invitation lifecycle over the in-memory repositories.
//!
//! Run with: `cargo test --features mocks --test lifecycle`

#![cfg(feature = "mocks")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use vestibule::actions::{
    ActivateInvitationAction, CreateInvitationAction, CreateInvitationInput, GetInvitationAction,
};
use vestibule::crypto::{Argon2Hasher, is_well_formed_token};
use vestibule::{
    AccountRepository, ActivationData, Caller, CallerIdentity, InvitationRepository, InviteError,
    MockAccountRepository, MockInvitationRepository, RepositoryAccountProvisioner, SecretString,
};

fn admin() -> Caller {
    Caller::Authenticated(CallerIdentity::new("admin"))
}

fn invite(email: &str) -> CreateInvitationInput {
    CreateInvitationInput {
        email: email.to_owned(),
        organization: None,
    }
}

fn provisioner(
    accounts: MockAccountRepository,
) -> RepositoryAccountProvisioner<MockAccountRepository, Argon2Hasher> {
    RepositoryAccountProvisioner::with_hasher(accounts, Argon2Hasher::new(1024, 1, 1))
}

#[tokio::test]
async fn test_alice_scenario() {
    let invitations = MockInvitationRepository::new();
    let accounts = MockAccountRepository::new();
    let create = CreateInvitationAction::new(invitations.clone());

    // create
    let invitation = create
        .execute(&admin(), invite("alice@example.com"))
        .await
        .expect("first invitation should be created");
    assert_eq!(invitation.token.len(), 128);
    assert!(is_well_formed_token(&invitation.token));

    let found = GetInvitationAction::new(invitations.clone())
        .execute(&invitation.token)
        .await
        .unwrap();
    assert_eq!(found.email, "alice@example.com");

    // duplicate
    let duplicate = create.execute(&admin(), invite("alice@example.com")).await;
    assert_eq!(duplicate, Err(InviteError::DuplicateInvitation));

    // activate
    let activate = ActivateInvitationAction::new(invitations.clone(), provisioner(accounts.clone()));
    activate
        .execute(
            &found,
            ActivationData {
                organization: "Acme".to_owned(),
                password: SecretString::new("p@ss"),
            },
        )
        .await
        .expect("activation should succeed");

    let account = accounts
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .expect("account should exist");
    assert_eq!(account.organization, "Acme");

    let gone = GetInvitationAction::new(invitations.clone())
        .execute(&invitation.token)
        .await;
    assert_eq!(gone, Err(InviteError::NotFound));
    assert!(invitations.find_by_token(&invitation.token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_email_can_be_invited_again_after_activation() {
    let invitations = MockInvitationRepository::new();
    let accounts = MockAccountRepository::new();
    let create = CreateInvitationAction::new(invitations.clone());
    let activate = ActivateInvitationAction::new(invitations.clone(), provisioner(accounts));

    let first = create
        .execute(&admin(), invite("alice@example.com"))
        .await
        .unwrap();
    activate
        .execute(
            &first,
            ActivationData {
                organization: "Acme".to_owned(),
                password: SecretString::new("p@ss"),
            },
        )
        .await
        .unwrap();

    let second = create
        .execute(&admin(), invite("alice@example.com"))
        .await
        .unwrap();
    assert_ne!(first.token, second.token);

    // the account collaborator refuses a second account for the same email
    let result = activate
        .execute(
            &second,
            ActivationData {
                organization: "Acme".to_owned(),
                password: SecretString::new("p@ss"),
            },
        )
        .await;
    assert!(matches!(result, Err(InviteError::AccountCreationFailed(_))));
    assert!(invitations.find_by_token(&second.token).await.unwrap().is_some());
}

#[tokio::test]
async fn test_tokens_are_unique_across_many_invitations() {
    let create =
        CreateInvitationAction::with_rng(MockInvitationRepository::new(), StdRng::seed_from_u64(99));

    let mut tokens = HashSet::new();
    for n in 0..50 {
        let invitation = create
            .execute(&admin(), invite(&format!("user{n}@example.com")))
            .await
            .unwrap();
        assert!(tokens.insert(invitation.token));
    }
}

#[tokio::test]
async fn test_concurrent_activation_provisions_once() {
    let invitations = MockInvitationRepository::new();
    let accounts = MockAccountRepository::new();
    let invitation = CreateInvitationAction::new(invitations.clone())
        .execute(&admin(), invite("alice@example.com"))
        .await
        .unwrap();

    let activate = ActivateInvitationAction::new(invitations.clone(), provisioner(accounts.clone()));
    let data = || ActivationData {
        organization: "Acme".to_owned(),
        password: SecretString::new("p@ss"),
    };

    let (a, b) = tokio::join!(
        activate.execute(&invitation, data()),
        activate.execute(&invitation, data())
    );

    assert_eq!(u8::from(a.is_ok()) + u8::from(b.is_ok()), 1);
    assert!(a == Err(InviteError::NotFound) || b == Err(InviteError::NotFound));
    assert_eq!(accounts.accounts.lock().unwrap().len(), 1);
    assert!(invitations.is_empty());
}
