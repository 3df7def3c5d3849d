//! # nova-db: Persisted State for NovaResto
//!
//! A key/value store of JSON documents, one per state key, backed by
//! SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        NovaResto Data Flow                              │
//! │                                                                         │
//! │  Service command (close_order)                                          │
//! │       │  changed keys: {nova_orders, nova_tables}                       │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     nova-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   snapshot    │    │    store      │    │  Migrations  │  │   │
//! │  │   │ load/persist  │───►│ StateStore    │    │  (embedded)  │  │   │
//! │  │   │ restaurant    │    │ Database/Mem  │    │ 001_state    │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                                │   │
//! │  │                        StateRepository (SQL)                    │   │
//! │  └────────────────────────────────┼────────────────────────────────┘   │
//! │                                   ▼                                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                SQLite: kv_state(key, value, updated_at)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - SQL for the `kv_state` table
//! - [`store`] - `StateStore` seam, memory store, typed load/save
//! - [`snapshot`] - Whole-restaurant load and change persistence
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nova_db::{load_restaurant, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("novaresto.db")).await?;
//! let restaurant = load_restaurant(&db, Catalog::seeded()).await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod snapshot;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::state::StateRepository;
pub use snapshot::{
    apply_writes, load_restaurant, load_session, pending_writes, session_write, PendingWrite,
    WriteSequencer,
};
pub use store::{load, save, MemoryStore, StateStore};
