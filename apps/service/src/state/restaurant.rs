//! # Restaurant State
//!
//! The restaurant store object shared by every command.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  command ──► with_restaurant_mut(|r| {                                  │
//! │                  r.close_order(..)?;       // engine call              │
//! │                  r.take_changes()          // {orders, tables}          │
//! │                  pending_writes(r, ..)     // serialize while locked    │
//! │              })                                                         │
//! │          ──► lock released                                              │
//! │          ──► apply_writes(store).await     // no lock across await      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Engine operations leave the restaurant untouched when they fail, so a
//! poisoned lock still guards consistent state and is recovered.

use nova_core::Restaurant;
use std::sync::{Mutex, PoisonError};

#[derive(Debug)]
pub struct RestaurantState {
    restaurant: Mutex<Restaurant>,
}

impl RestaurantState {
    pub fn new(restaurant: Restaurant) -> Self {
        RestaurantState {
            restaurant: Mutex::new(restaurant),
        }
    }

    /// Executes a function with read access to the restaurant.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let summary = state.with_restaurant(|r| r.summary());
    /// ```
    pub fn with_restaurant<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Restaurant) -> R,
    {
        let restaurant = self
            .restaurant
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&restaurant)
    }

    /// Executes a function with write access to the restaurant.
    pub fn with_restaurant_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Restaurant) -> R,
    {
        let mut restaurant = self
            .restaurant
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut restaurant)
    }
}
