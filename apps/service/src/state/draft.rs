//! # Draft State
//!
//! The order being built on the POS screen before it is sent to a table.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft State Operations                               │
//! │                                                                         │
//! │  Frontend Action          Command                 Draft Change          │
//! │  ───────────────          ───────                 ────────────          │
//! │                                                                         │
//! │  Tap menu item ──────────► add_to_draft() ──────► line += 1 / push      │
//! │                                                                         │
//! │  Tap trash icon ─────────► remove_from_draft() ─► drop item's lines    │
//! │                                                                         │
//! │  "Envoyer" ──────────────► submit_order() ──────► items → Order,       │
//! │                                                    draft cleared        │
//! │                                                                         │
//! │  Back to floor plan ─────► clear_draft() ───────► lines.clear()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices are frozen on the line when the item is added.

use nova_core::{Money, OrderDraft, OrderItem};
use serde::Serialize;
use std::sync::{Mutex, PoisonError};

/// Draft contents for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub lines: Vec<OrderItem>,
    pub total: Money,
    pub item_count: i64,
}

impl From<&OrderDraft> for DraftView {
    fn from(draft: &OrderDraft) -> Self {
        DraftView {
            lines: draft.lines().to_vec(),
            total: draft.total(),
            item_count: draft.lines().iter().map(|l| l.quantity).sum(),
        }
    }
}

#[derive(Debug, Default)]
pub struct DraftState {
    draft: Mutex<OrderDraft>,
}

impl DraftState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draft<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&OrderDraft) -> R,
    {
        let draft = self.draft.lock().unwrap_or_else(PoisonError::into_inner);
        f(&draft)
    }

    pub fn with_draft_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut OrderDraft) -> R,
    {
        let mut draft = self.draft.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut draft)
    }
}
