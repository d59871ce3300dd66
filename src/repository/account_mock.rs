#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use super::account::{Account, AccountRepository, NewAccount};
use crate::InviteError;

#[derive(Clone)]
pub struct MockAccountRepository {
    pub accounts: Arc<Mutex<Vec<Account>>>,
    next_id: Arc<AtomicI64>,
}

impl MockAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(Mutex::new(vec![])),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for MockAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, InviteError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn create(&self, data: NewAccount) -> Result<Account, InviteError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.email == data.email) {
            return Err(InviteError::AccountCreationFailed(
                "account already exists for this email".to_owned(),
            ));
        }

        let account = Account {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            email: data.email,
            organization: data.organization,
            hashed_password: data.hashed_password,
            created_at: Utc::now(),
        };
        accounts.push(account.clone());
        drop(accounts);

        Ok(account)
    }
}
