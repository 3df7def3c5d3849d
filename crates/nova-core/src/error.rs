//! # Error Types
//!
//! Domain-specific error types for nova-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  nova-core errors (this file)                                          │
//! │  ├── CoreError        - Engine rule violations and lookups             │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── AdvisoryError    - Advisory service failures (absorbed)           │
//! │                                                                         │
//! │  nova-db errors (separate crate)                                       │
//! │  └── DbError          - Storage failures (absorbed)                    │
//! │                                                                         │
//! │  Service errors (in app)                                               │
//! │  └── ApiError         - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Presentation           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Taxonomy
//! Every `CoreError` classifies into an [`ErrorKind`]. A failed operation
//! never leaves an entity half-mutated, so callers can retry or show the
//! message and carry on.

use thiserror::Error;

use crate::types::{ItemStatus, OrderStatus, TableStatus};

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification used by callers to pick a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input.
    Validation,
    /// The operation would break a state invariant.
    Conflict,
    /// Lookup by identity failed.
    NotFound,
    /// The current role may not perform the operation.
    AccessDenied,
    /// Advisory service or storage unavailable.
    External,
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A table can hold one open order at a time.
    ///
    /// ## When This Occurs
    /// ```text
    /// Table 3 (OCCUPIED, order A)
    ///      │
    ///      ▼
    /// create_order(table 3, ...)
    ///      │
    ///      ▼
    /// TableOccupied { table_id: "t3", order_id: Some("A") }
    ///      │
    ///      ▼
    /// Table 3 still OCCUPIED with order A
    /// ```
    #[error("Table {table_id} is already occupied")]
    TableOccupied {
        table_id: String,
        order_id: Option<String>,
    },

    /// Table is not in a state that allows the requested transition.
    #[error("Table {table_id} is {current}, cannot {action}")]
    InvalidTableTransition {
        table_id: String,
        current: TableStatus,
        action: &'static str,
    },

    /// Items may only change while the order is OPEN.
    #[error("Order {order_id} is {current}, cannot perform operation")]
    OrderNotOpen {
        order_id: String,
        current: OrderStatus,
    },

    /// Kitchen status may only move PENDING → COOKING → READY.
    #[error("Item {item_id} cannot move from {from} to {to}")]
    InvalidItemTransition {
        item_id: String,
        from: ItemStatus,
        to: ItemStatus,
    },

    /// Whole-ticket serve needs every line READY.
    #[error("Order {order_id} has {pending} item(s) not ready")]
    TicketNotReady { order_id: String, pending: usize },

    /// A table with an open order cannot be removed from the floor.
    #[error("Table {table_id} has an open order and cannot be removed")]
    TableInUse { table_id: String },

    /// The directory must keep at least one administrator.
    #[error("Cannot remove the last administrator")]
    LastAdmin,

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Item id (kitchen) or menu item id (removal) absent from the order.
    #[error("Item {item_id} not found on order {order_id}")]
    OrderItemNotFound { order_id: String, item_id: String },

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    #[error("Inventory item not found: {0}")]
    InventoryItemNotFound(String),

    /// Unknown user, or a credential mismatch. The two are not told apart.
    #[error("User not found")]
    UserNotFound,

    /// No authenticated session.
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Access denied: {role} may not {operation}")]
    AccessDenied { role: String, operation: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Maps the error into the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::TableOccupied { .. }
            | CoreError::InvalidTableTransition { .. }
            | CoreError::OrderNotOpen { .. }
            | CoreError::InvalidItemTransition { .. }
            | CoreError::TicketNotReady { .. }
            | CoreError::TableInUse { .. }
            | CoreError::LastAdmin => ErrorKind::Conflict,
            CoreError::TableNotFound(_)
            | CoreError::OrderNotFound(_)
            | CoreError::OrderItemNotFound { .. }
            | CoreError::MenuItemNotFound(_)
            | CoreError::InventoryItemNotFound(_)
            | CoreError::UserNotFound => ErrorKind::NotFound,
            CoreError::NotAuthenticated | CoreError::AccessDenied { .. } => {
                ErrorKind::AccessDenied
            }
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (bad email, NaN quantity, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (username, table number).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Advisory Error
// =============================================================================

/// Failures of the advisory collaborator.
///
/// These never reach the presentation layer: [`crate::advisory`] turns them
/// into fixed fallback values.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// No API key configured.
    #[error("Advisory service is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-success status or an unusable body.
    #[error("Invalid response: {0}")]
    Response(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Request timed out")]
    Timeout,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::TableOccupied {
            table_id: "t3".to_string(),
            order_id: Some("o1".to_string()),
        };
        assert_eq!(err.to_string(), "Table t3 is already occupied");

        let err = CoreError::InvalidItemTransition {
            item_id: "x".to_string(),
            from: ItemStatus::Pending,
            to: ItemStatus::Ready,
        };
        assert_eq!(err.to_string(), "Item x cannot move from PENDING to READY");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let err: CoreError = ValidationError::Required {
            field: "username".to_string(),
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(CoreError::LastAdmin.kind(), ErrorKind::Conflict);
        assert_eq!(CoreError::UserNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            CoreError::OrderNotOpen {
                order_id: "o".to_string(),
                current: OrderStatus::Paid,
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(CoreError::NotAuthenticated.kind(), ErrorKind::AccessDenied);
    }
}
