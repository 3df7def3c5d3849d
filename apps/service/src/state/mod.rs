//! # Service State
//!
//! ```text
//! state/
//! ├── mod.rs         ◄─── You are here (exports)
//! ├── restaurant.rs  ◄─── Restaurant store object (Mutex)
//! ├── session.rs     ◄─── Signed-in user (Mutex)
//! ├── draft.rs       ◄─── POS order draft (Mutex)
//! └── config.rs      ◄─── Configuration (read-only)
//! ```

mod config;
mod draft;
mod restaurant;
mod session;

pub use config::{currency_code, ConfigState, CredentialMode};
pub use draft::{DraftState, DraftView};
pub use restaurant::RestaurantState;
pub use session::SessionState;
