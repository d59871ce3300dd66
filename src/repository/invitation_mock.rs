#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::invitation::{Invitation, InvitationRepository};
use crate::InviteError;

/// In-memory invitation store.
///
/// Enforces email and token uniqueness on insert the way a unique index
/// would. Clones share the same records.
#[derive(Clone, Default)]
pub struct MockInvitationRepository {
    pub invitations: Arc<Mutex<Vec<Invitation>>>,
}

impl MockInvitationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.invitations.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl InvitationRepository for MockInvitationRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Invitation>, InviteError> {
        let invitations = self.invitations.lock().unwrap();
        Ok(invitations.iter().find(|i| i.email == email).cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>, InviteError> {
        let invitations = self.invitations.lock().unwrap();
        Ok(invitations.iter().find(|i| i.token == token).cloned())
    }

    async fn insert(&self, invitation: &Invitation) -> Result<(), InviteError> {
        let mut invitations = self.invitations.lock().unwrap();
        if invitations
            .iter()
            .any(|i| i.email == invitation.email || i.token == invitation.token)
        {
            return Err(InviteError::DuplicateInvitation);
        }
        invitations.push(invitation.clone());
        drop(invitations);

        Ok(())
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), InviteError> {
        let mut invitations = self.invitations.lock().unwrap();
        invitations.retain(|i| i.token != token);
        drop(invitations);
        Ok(())
    }

    async fn take_by_token(&self, token: &str) -> Result<Option<Invitation>, InviteError> {
        let mut invitations = self.invitations.lock().unwrap();
        let taken = invitations
            .iter()
            .position(|i| i.token == token)
            .map(|idx| invitations.remove(idx));
        drop(invitations);
        Ok(taken)
    }
}
