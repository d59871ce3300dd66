//! Invitation lifecycle operations.
//!
//! Each action owns its collaborators and exposes a single `execute` method.

mod activate_invitation;
mod create_invitation;
mod get_invitation;
mod revoke_invitation;

pub use activate_invitation::ActivateInvitationAction;
pub use create_invitation::{CreateInvitationAction, CreateInvitationInput};
pub use get_invitation::GetInvitationAction;
pub use revoke_invitation::RevokeInvitationAction;
