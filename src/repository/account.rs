use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::InviteError;

/// An account provisioned from an activated invitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub organization: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub organization: String,
    pub hashed_password: String,
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, InviteError>;

    /// Persists a new account. A second account for the same email is
    /// rejected with `AccountCreationFailed`.
    async fn create(&self, data: NewAccount) -> Result<Account, InviteError>;
}
