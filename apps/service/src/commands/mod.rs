//! # Service Commands
//!
//! Every action the presentation layer can take, one async function each.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (exports)
//! ├── session.rs     ◄─── Login, logout, restore
//! ├── navigation.rs  ◄─── View gating and menu
//! ├── dashboard.rs   ◄─── Summary cards
//! ├── pos.rs         ◄─── Tables, draft, orders
//! ├── kitchen.rs     ◄─── Tickets and line progress
//! ├── inventory.rs   ◄─── Stock levels and forecast
//! ├── assistant.rs   ◄─── Free-text advice
//! └── settings.rs    ◄─── Floor, users, currency
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  pos::close_order(&app, "o1", CloseOutcome::Paid)                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  app.commit(Operation::CloseOrder, |r| r.close_order(..))               │
//! │         │   role check, engine call, persist changed keys               │
//! │         ▼                                                               │
//! │  Result<OrderResponse, ApiError>   (JSON to the presentation layer)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads gate on the hosting view; mutations gate on their operation.

pub mod assistant;
pub mod dashboard;
pub mod inventory;
pub mod kitchen;
pub mod navigation;
pub mod pos;
pub mod session;
pub mod settings;
