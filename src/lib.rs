//! Single-use signup invitations.
//!
//! An invitation binds an email address to an opaque activation token. The
//! token is later presented together with account details to provision a
//! real account, and the invitation is retired in the same step.
//!
//! The crate is organised the same way for every concern:
//!
//! - [`repository`] defines the storage traits ([`InvitationRepository`],
//!   [`AccountRepository`]) and the data types they move around.
//! - [`actions`] holds the lifecycle operations (create, get, activate,
//!   revoke), each a small struct generic over its collaborators.
//! - [`provisioning`] is the seam to the account system, with an Argon2
//!   reference implementation.
//! - `sqlite` (feature `sqlx_sqlite`) and `api::axum` (feature `axum_api`)
//!   are concrete backends and an HTTP resource layer.
//!
//! Enable the `mocks` feature for in-memory repositories.

pub mod actions;
pub mod config;
pub mod crypto;
pub mod identity;
pub mod provisioning;
pub mod repository;
mod secret;
pub mod validators;

#[cfg(feature = "axum_api")]
pub mod api;

#[cfg(feature = "sqlx_sqlite")]
pub mod sqlite;

pub use identity::{Authenticator, Caller, CallerIdentity, StaticTokenAuthenticator};
pub use provisioning::{AccountProvisioner, NewAccountRequest, RepositoryAccountProvisioner};
pub use repository::{
    Account, AccountRepository, ActivationData, InternalKey, Invitation, InvitationRepository,
    NewAccount,
};
pub use secret::SecretString;

#[cfg(any(test, feature = "mocks"))]
pub use repository::{MockAccountRepository, MockInvitationRepository};

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteError {
    /// No invitation matches the given token or email.
    NotFound,
    /// A pending invitation already exists for this email.
    DuplicateInvitation,
    /// The operation needs an authenticated caller.
    Unauthorized,
    /// The account collaborator rejected the activation data.
    AccountCreationFailed(String),
    /// The persistence layer is unavailable or errored.
    StoreFailure(String),
    /// The email does not look like an address.
    InvalidEmail,
    /// The request body could not be read as the expected payload.
    MalformedRequest(String),
}

impl std::error::Error for InviteError {}

impl fmt::Display for InviteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InviteError::NotFound => write!(f, "No such invitation"),
            InviteError::DuplicateInvitation => {
                write!(f, "Invitation to this email already exists")
            }
            InviteError::Unauthorized => write!(f, "You must be logged in to do that"),
            InviteError::AccountCreationFailed(msg) => write!(f, "Account creation failed: {msg}"),
            InviteError::StoreFailure(msg) => write!(f, "Store failure: {msg}"),
            InviteError::InvalidEmail => write!(f, "Invalid email format"),
            InviteError::MalformedRequest(msg) => write!(f, "Bad invitation: {msg}"),
        }
    }
}
