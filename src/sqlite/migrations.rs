//! Embedded database migrations for `SQLite`.
//!
//! ```rust,ignore
//! use vestibule::sqlite::migrations;
//! use sqlx::SqlitePool;
//!
//! async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
//!     migrations::run(pool).await?;
//!     Ok(())
//! }
//! ```

use sqlx::{Executor, SqlitePool};

const MIGRATIONS: &[(&str, &str)] = &[
    (
        "20250101000001_create_invitations_table",
        include_str!("../../migrations_sqlite/20250101000001_create_invitations_table.sql"),
    ),
    (
        "20250101000002_create_accounts_table",
        include_str!("../../migrations_sqlite/20250101000002_create_accounts_table.sql"),
    ),
];

/// Runs all pending migrations.
///
/// Applied migrations are tracked in the `_vestibule_migrations` table, so
/// calling this on every startup is safe.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    pool.execute(
        r"
        CREATE TABLE IF NOT EXISTS _vestibule_migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        ",
    )
    .await?;

    for (name, sql) in MIGRATIONS {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _vestibule_migrations WHERE name = ?)")
                .bind(*name)
                .fetch_one(pool)
                .await?;

        if applied {
            continue;
        }

        // one statement per execute; bundled migrations keep semicolons out of literals
        for statement in sql.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                pool.execute(trimmed).await?;
            }
        }

        sqlx::query("INSERT INTO _vestibule_migrations (name) VALUES (?)")
            .bind(*name)
            .execute(pool)
            .await?;

        log::info!(target: "vestibule", "msg=\"migration applied\", name=\"{name}\"");
    }

    Ok(())
}
