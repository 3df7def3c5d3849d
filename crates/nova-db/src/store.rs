//! # State Store
//!
//! The key/value seam the service persists through.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  load(store, key, default)                                              │
//! │       │                                                                 │
//! │       ├── value present and parses  ──► value                          │
//! │       ├── value missing             ──► default                        │
//! │       ├── value corrupt             ──► default  (warn)                │
//! │       └── store unavailable         ──► default  (warn)                │
//! │                                                                         │
//! │  save(store, key, value)    ──► DbResult<()>   caller decides          │
//! │  remove(key)                ──► DbResult<()>                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two implementations: [`Database`] (SQLite) and [`MemoryStore`].

use async_trait::async_trait;
use nova_core::StateKey;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::pool::Database;

// =============================================================================
// Trait
// =============================================================================

/// Raw key/value storage of JSON documents.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load_raw(&self, key: StateKey) -> DbResult<Option<String>>;

    async fn save_raw(&self, key: StateKey, value: String) -> DbResult<()>;

    async fn remove(&self, key: StateKey) -> DbResult<()>;
}

#[async_trait]
impl StateStore for Database {
    async fn load_raw(&self, key: StateKey) -> DbResult<Option<String>> {
        self.state().get_raw(key.as_str()).await
    }

    async fn save_raw(&self, key: StateKey, value: String) -> DbResult<()> {
        self.state().put_raw(key.as_str(), &value).await
    }

    async fn remove(&self, key: StateKey) -> DbResult<()> {
        self.state().delete(key.as_str()).await.map(|_| ())
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// Process-local store. Used by tests and when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<StateKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, bypassing serialization.
    pub fn insert_raw(&self, key: StateKey, value: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value.into());
    }

    pub fn get_raw(&self, key: StateKey) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    pub fn contains(&self, key: StateKey) -> bool {
        self.get_raw(key).is_some()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load_raw(&self, key: StateKey) -> DbResult<Option<String>> {
        Ok(self.get_raw(key))
    }

    async fn save_raw(&self, key: StateKey, value: String) -> DbResult<()> {
        self.insert_raw(key, value);
        Ok(())
    }

    async fn remove(&self, key: StateKey) -> DbResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
        Ok(())
    }
}

// =============================================================================
// Typed Helpers
// =============================================================================

/// Loads `key`, falling back to `default` when the value is missing,
/// corrupt or unreachable. Never fails.
pub async fn load<T, S>(store: &S, key: StateKey, default: T) -> T
where
    T: DeserializeOwned,
    S: StateStore + ?Sized,
{
    match store.load_raw(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(%key, "State loaded");
                value
            }
            Err(e) => {
                warn!(%key, error = %e, "Corrupt state value, using default");
                default
            }
        },
        Ok(None) => {
            debug!(%key, "No stored state, using default");
            default
        }
        Err(e) => {
            warn!(%key, error = %e, "State store unavailable, using default");
            default
        }
    }
}

/// Serializes and stores `value` under `key`.
pub async fn save<T, S>(store: &S, key: StateKey, value: &T) -> DbResult<()>
where
    T: Serialize + ?Sized,
    S: StateStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|e| DbError::corrupt(key.as_str(), e))?;
    store.save_raw(key, raw).await
}

// =============================================================================
// Unit Tests
// =============================================================================
