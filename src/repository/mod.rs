//! Repository traits and data types.
//!
//! Implement these traits to back invitations and accounts with your own
//! storage.
//!
//! | Trait | Description |
//! |-------|-------------|
//! | [`InvitationRepository`] | Pending invitation records |
//! | [`AccountRepository`] | Accounts created on activation |
//!
//! Enable the `mocks` feature for [`MockInvitationRepository`] and
//! [`MockAccountRepository`], in-memory implementations useful for testing.

mod account;
mod invitation;

#[cfg(any(test, feature = "mocks"))]
mod account_mock;
#[cfg(any(test, feature = "mocks"))]
mod invitation_mock;

pub use account::{Account, AccountRepository, NewAccount};
pub use invitation::{ActivationData, InternalKey, Invitation, InvitationRepository};

#[cfg(any(test, feature = "mocks"))]
pub use account_mock::MockAccountRepository;
#[cfg(any(test, feature = "mocks"))]
pub use invitation_mock::MockInvitationRepository;
