//! `SQLite` database backend implementations.
//!
//! Enable the `sqlx_sqlite` feature to use these implementations, and run
//! [`migrations::run`] once before first use.

mod account;
mod invitation;
pub mod migrations;

pub use account::SqliteAccountRepository;
pub use invitation::SqliteInvitationRepository;
use sqlx::SqlitePool;

/// Creates the invitation and account repositories over one pool.
pub fn create_repositories(
    pool: SqlitePool,
) -> (SqliteInvitationRepository, SqliteAccountRepository) {
    (
        SqliteInvitationRepository::new(pool.clone()),
        SqliteAccountRepository::new(pool),
    )
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
