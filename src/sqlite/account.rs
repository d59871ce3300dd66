//! `SQLite` implementation of [`AccountRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use super::is_unique_violation;
use crate::InviteError;
use crate::repository::{Account, AccountRepository, NewAccount};

#[derive(Clone)]
pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AccountRecord {
    id: i64,
    email: String,
    organization: String,
    hashed_password: String,
    created_at: DateTime<Utc>,
}

impl From<AccountRecord> for Account {
    fn from(row: AccountRecord) -> Self {
        Account {
            id: row.id,
            email: row.email,
            organization: row.organization,
            hashed_password: row.hashed_password,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, InviteError> {
        let row: Option<AccountRecord> = sqlx::query_as(
            "SELECT id, email, organization, hashed_password, created_at FROM accounts WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "vestibule", "msg=\"database error\", operation=\"find_account_by_email\", error=\"{e}\"");
            InviteError::StoreFailure(e.to_string())
        })?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn create(&self, data: NewAccount) -> Result<Account, InviteError> {
        let row: AccountRecord = sqlx::query_as(
            r"
            INSERT INTO accounts (email, organization, hashed_password, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, email, organization, hashed_password, created_at
            ",
        )
        .bind(&data.email)
        .bind(&data.organization)
        .bind(&data.hashed_password)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                InviteError::AccountCreationFailed(
                    "account already exists for this email".to_owned(),
                )
            } else {
                log::error!(target: "vestibule", "msg=\"database error\", operation=\"create_account\", error=\"{e}\"");
                InviteError::StoreFailure(e.to_string())
            }
        })?;

        Ok(row.into())
    }
}
