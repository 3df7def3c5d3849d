//! # nova-core: Pure Business Logic for NovaResto
//!
//! Table occupancy, order lifecycle, kitchen tickets, stock ledger and
//! role-based access. No I/O of any kind.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        NovaResto Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Presentation layer                           │   │
//! │  │    Floor plan ──► POS ──► Kitchen board ──► Stocks ──► Settings │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    nova-service commands                        │   │
//! │  │    login, submit_order, advance_item, adjust_stock, etc.       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ nova-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  access  │ │  order   │ │  table   │ │ session  │          │   │
//! │  │   │  policy  │ │  engine  │ │  engine  │ │ identity │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │inventory │ │restaurant│ │ advisory │ │  money   │          │   │
//! │  │   │  ledger  │ │  store   │ │   seam   │ │  cents   │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                │                                  │                     │
//! │  ┌─────────────▼──────────────┐    ┌──────────────▼─────────────────┐  │
//! │  │  nova-db (persisted state) │    │  nova-advisor (Gemini client)  │  │
//! │  └────────────────────────────┘    └────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Table, Order, InventoryItem, User, ...)
//! - [`money`] - Integer cents and inclusive VAT
//! - [`error`] - Domain error types and their taxonomy
//! - [`validation`] - Input rules
//! - [`catalog`] - Menu and seed data
//! - [`access`] - Role → view policy
//! - [`table`] - Table state machine
//! - [`order`] - Order engine and cart
//! - [`inventory`] - Stock ledger
//! - [`session`] - User directory, credentials, session
//! - [`restaurant`] - Store object with change tracking
//! - [`advisory`] - Advisory service seam
//!
//! ## Example Usage
//!
//! ```rust
//! use nova_core::order::OrderDraft;
//! use nova_core::{Restaurant, TableStatus};
//!
//! let mut restaurant = Restaurant::seeded();
//! let mut draft = OrderDraft::new();
//! let pizza = restaurant.catalog().menu_item("m1").unwrap().clone();
//! draft.add(&pizza).unwrap();
//! draft.add(&pizza).unwrap();
//!
//! let order = restaurant.create_order("t1", draft.into_items()).unwrap();
//! assert_eq!(order.total().cents(), 2500);
//! assert_eq!(restaurant.table("t1").unwrap().status(), TableStatus::Occupied);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod advisory;
pub mod catalog;
pub mod error;
pub mod inventory;
pub mod money;
pub mod order;
pub mod restaurant;
pub mod session;
pub mod table;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use access::{Navigation, Operation, View};
pub use advisory::{AdvisoryService, StockForecast};
pub use catalog::Catalog;
pub use error::{AdvisoryError, CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::{Money, TaxRate};
pub use order::{OrderDraft, OrderTotals};
pub use restaurant::{DashboardSummary, Restaurant, RestaurantParts};
pub use session::{CredentialCheck, Session, SessionRecord, UserDirectory};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity on a single order line.
///
/// Catches slips like typing 100 instead of 10 on the POS keypad.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum seats at one table.
pub const MAX_TABLE_CAPACITY: u32 = 50;

/// Currency symbol used when none is stored.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "€";

/// Longest accepted currency symbol ("CHF", "R$").
pub const MAX_CURRENCY_SYMBOL_LEN: usize = 4;
