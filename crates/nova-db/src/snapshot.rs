//! # Restaurant Snapshots
//!
//! Whole-restaurant boot load and per-key persistence of changes.
//!
//! ```text
//! Boot:     load_restaurant(store) ── every key, seeded defaults ──► Restaurant
//!
//! Command:  lock ─► mutate ─► take_changes() ─► pending_writes() ─► unlock
//!                                                     │
//!                                                     ▼
//!                                    apply_writes(store)  (async, no lock held)
//! ```
//!
//! Serialization happens while the caller still holds the restaurant, so
//! the documents written are a consistent view of one version. Each write
//! carries that version; [`WriteSequencer`] drops a write that arrives after
//! a newer document for the same key was already stored.

use std::collections::HashMap;

use nova_core::{Catalog, Restaurant, RestaurantParts, SessionRecord, StateKey};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::error::{DbError, DbResult};
use crate::store::{load, StateStore};

/// One document to write (or delete, when `value` is `None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub key: StateKey,
    pub value: Option<String>,
    /// Restaurant version the document was serialized at. `None` for keys
    /// the restaurant does not own (the session marker).
    pub version: Option<u64>,
}

/// Rebuilds the restaurant from `store`, defaulting each key independently.
pub async fn load_restaurant<S>(store: &S, catalog: Catalog) -> Restaurant
where
    S: StateStore + ?Sized,
{
    let seeded = RestaurantParts::seeded();
    let parts = RestaurantParts {
        tables: load(store, StateKey::Tables, seeded.tables).await,
        orders: load(store, StateKey::Orders, seeded.orders).await,
        inventory: load(store, StateKey::Inventory, seeded.inventory).await,
        users: load(store, StateKey::Users, seeded.users).await,
        currency: load(store, StateKey::Currency, seeded.currency).await,
    };

    let restaurant = Restaurant::from_parts(catalog, parts);
    info!(
        tables = restaurant.tables().len(),
        orders = restaurant.orders().len(),
        users = restaurant.directory().users().len(),
        "Restaurant state loaded"
    );
    restaurant
}

/// The persisted session marker, if any.
pub async fn load_session<S>(store: &S) -> Option<SessionRecord>
where
    S: StateStore + ?Sized,
{
    load(store, StateKey::Session, None).await
}

/// Serializes the documents for `keys`.
///
/// The session key is not owned by the restaurant and is skipped.
pub fn pending_writes<I>(restaurant: &Restaurant, keys: I) -> DbResult<Vec<PendingWrite>>
where
    I: IntoIterator<Item = StateKey>,
{
    let mut writes = Vec::new();
    for key in keys {
        let value = match key {
            StateKey::Tables => serde_json::to_string(restaurant.tables()),
            StateKey::Orders => serde_json::to_string(restaurant.orders()),
            StateKey::Inventory => serde_json::to_string(restaurant.inventory()),
            StateKey::Users => serde_json::to_string(restaurant.directory().users()),
            StateKey::Currency => serde_json::to_string(restaurant.currency()),
            StateKey::Session => continue,
        }
        .map_err(|e| DbError::corrupt(key.as_str(), e))?;

        writes.push(PendingWrite {
            key,
            value: Some(value),
            version: Some(restaurant.version()),
        });
    }
    Ok(writes)
}

/// The write that records (or clears) the session marker.
pub fn session_write(record: Option<&SessionRecord>) -> DbResult<PendingWrite> {
    let value = record
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| DbError::corrupt(StateKey::Session.as_str(), e))?;
    Ok(PendingWrite {
        key: StateKey::Session,
        value,
        version: None,
    })
}

/// Applies `writes`, logging each failure. Returns the number that failed.
pub async fn apply_writes<S>(store: &S, writes: Vec<PendingWrite>) -> usize
where
    S: StateStore + ?Sized,
{
    let mut failed = 0;
    for PendingWrite { key, value, .. } in writes {
        let result = match value {
            Some(value) => store.save_raw(key, value).await,
            None => store.remove(key).await,
        };
        match result {
            Ok(()) => debug!(%key, "State persisted"),
            Err(e) => {
                error!(%key, error = %e, "Failed to persist state");
                failed += 1;
            }
        }
    }
    failed
}

// =============================================================================
// Write Ordering
// =============================================================================

/// Serializes writes from concurrent commands.
///
/// Commands serialize under the restaurant lock but write after releasing
/// it, so two commands can reach the store out of order. The sequencer
/// remembers the last version stored per key and skips older documents.
#[derive(Debug, Default)]
pub struct WriteSequencer {
    stored: Mutex<HashMap<StateKey, u64>>,
}

impl WriteSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the writes that are not older than what is stored. Returns
    /// the number that failed, like [`apply_writes`].
    pub async fn apply<S>(&self, store: &S, writes: Vec<PendingWrite>) -> usize
    where
        S: StateStore + ?Sized,
    {
        let mut stored = self.stored.lock().await;
        let fresh: Vec<PendingWrite> = writes
            .into_iter()
            .filter(|write| {
                let Some(version) = write.version else {
                    return true;
                };
                let last = stored.get(&write.key).copied();
                if last.is_some_and(|last| last > version) {
                    debug!(key = %write.key, version, ?last, "Skipping stale write");
                    return false;
                }
                stored.insert(write.key, version);
                true
            })
            .collect();

        // Held across the store calls so a newer write cannot land first
        apply_writes(store, fresh).await
    }
}
