//! `SQLite` implementation of [`InvitationRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use super::is_unique_violation;
use crate::InviteError;
use crate::repository::{Invitation, InvitationRepository};

/// `SQLite`-backed invitation store.
///
/// The `invitations` table carries `UNIQUE` constraints on both `email` and
/// `token`, so concurrent creators for one address cannot both insert.
#[derive(Clone)]
pub struct SqliteInvitationRepository {
    pool: SqlitePool,
}

impl SqliteInvitationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct InvitationRecord {
    internal_key: String,
    token: String,
    email: String,
    organization: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<InvitationRecord> for Invitation {
    type Error = InviteError;

    fn try_from(row: InvitationRecord) -> Result<Self, Self::Error> {
        Ok(Invitation {
            key: row.internal_key.parse()?,
            token: row.token,
            email: row.email,
            organization: row.organization,
            created_at: row.created_at,
        })
    }
}

fn store_failure(operation: &str, e: &sqlx::Error) -> InviteError {
    log::error!(target: "vestibule", "msg=\"database error\", operation=\"{operation}\", error=\"{e}\"");
    InviteError::StoreFailure(e.to_string())
}

#[async_trait]
impl InvitationRepository for SqliteInvitationRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_email(&self, email: &str) -> Result<Option<Invitation>, InviteError> {
        let row: Option<InvitationRecord> = sqlx::query_as(
            "SELECT internal_key, token, email, organization, created_at FROM invitations WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_failure("find_invitation_by_email", &e))?;

        row.map(TryInto::try_into).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>, InviteError> {
        let row: Option<InvitationRecord> = sqlx::query_as(
            "SELECT internal_key, token, email, organization, created_at FROM invitations WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_failure("find_invitation_by_token", &e))?;

        row.map(TryInto::try_into).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn insert(&self, invitation: &Invitation) -> Result<(), InviteError> {
        sqlx::query(
            r"
            INSERT INTO invitations (internal_key, token, email, organization, created_at)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(invitation.key.to_hex())
        .bind(&invitation.token)
        .bind(&invitation.email)
        .bind(&invitation.organization)
        .bind(invitation.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                InviteError::DuplicateInvitation
            } else {
                store_failure("insert_invitation", &e)
            }
        })?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn delete_by_token(&self, token: &str) -> Result<(), InviteError> {
        sqlx::query("DELETE FROM invitations WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| store_failure("delete_invitation", &e))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn take_by_token(&self, token: &str) -> Result<Option<Invitation>, InviteError> {
        let row: Option<InvitationRecord> = sqlx::query_as(
            r"
            DELETE FROM invitations WHERE token = ?
            RETURNING internal_key, token, email, organization, created_at
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_failure("take_invitation", &e))?;

        row.map(TryInto::try_into).transpose()
    }
}
