//! # Repository Module
//!
//! SQL lives here and nowhere else.
//!
//! ```text
//! StateStore::save_raw(key, json)
//!      │
//!      ▼
//! StateRepository::put_raw ──► INSERT ... ON CONFLICT(key) DO UPDATE
//!      │
//!      ▼
//! kv_state (key, value, updated_at)
//! ```
//!
//! ## Available Repositories
//!
//! - [`state::StateRepository`] - Key/value JSON documents

pub mod state;
