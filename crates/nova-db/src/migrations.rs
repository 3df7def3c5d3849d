//! # Schema Migrations
//!
//! The schema is one key/value table, embedded from `migrations/sqlite`
//! at compile time and applied when a [`crate::Database`] opens.
//!
//! ```text
//! open ──► _sqlx_migrations ──► 001_state.sql applied? ──► kv_state ready
//!                                      │ no
//!                                      └──► apply, record checksum
//! ```
//!
//! Applied files are checksummed; new schema goes in a new `NNN_*.sql`
//! file, never into an applied one.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let (total, applied) = migration_status(pool).await?;
    if applied >= total {
        debug!(total, "Schema up to date");
        return Ok(());
    }

    MIGRATOR.run(pool).await?;
    info!(applied = total - applied, "Schema migrated");
    Ok(())
}

/// `(embedded, applied)` migration counts. A database that was never
/// migrated reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.iter().count();

    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    Ok((embedded, usize::try_from(applied).unwrap_or(0)))
}
