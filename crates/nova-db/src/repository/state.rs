//! # State Repository
//!
//! Raw access to the `kv_state` table. Values are opaque JSON text here;
//! typing happens in [`crate::store`].

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// A stored row.
#[derive(Debug, Clone, FromRow)]
pub struct StateEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Repository over `kv_state`.
#[derive(Debug, Clone)]
pub struct StateRepository {
    pool: SqlitePool,
}

impl StateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StateRepository { pool }
    }

    /// Returns the entry for `key`, or `None` if it was never written.
    pub async fn get(&self, key: &str) -> DbResult<Option<StateEntry>> {
        let entry = sqlx::query_as::<_, StateEntry>(
            r#"
            SELECT key, value, updated_at
            FROM kv_state
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn get_raw(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.get(key).await?.map(|entry| entry.value))
    }

    /// Writes `value` under `key`, replacing any previous value.
    pub async fn put_raw(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Utc::now();
        debug!(key, bytes = value.len(), "Writing state");

        sqlx::query(
            r#"
            INSERT INTO kv_state (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes `key`. Returns whether a row existed.
    pub async fn delete(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM kv_state WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All stored keys, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>("SELECT key FROM kv_state ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }
}
