//! # API Error Type
//!
//! Unified error type for service commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in NovaResto                              │
//! │                                                                         │
//! │  Presentation layer           Rust service                              │
//! │  ──────────────────           ────────────                              │
//! │                                                                         │
//! │  submit_order(t2)                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function: Result<T, ApiError>                           │  │
//! │  │         │                                                        │  │
//! │  │  No session / role denied ─── ACCESS_DENIED ──────────────┐      │  │
//! │  │  Bad input ─────────────────── VALIDATION_ERROR ──────────┤      │  │
//! │  │  Invariant violated ────────── CONFLICT ──────────────────┤      │  │
//! │  │  Unknown id ────────────────── NOT_FOUND ─────────────────┼──► e │  │
//! │  │  Storage (never from commands,                            │      │  │
//! │  │   persistence failures are logged) ── STORAGE_ERROR ──────┘      │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  catch (e) { switch (e.code) { case 'CONFLICT': ... } }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected command leaves every entity as it was.

use nova_core::{CoreError, ErrorKind};
use nova_db::DbError;
use serde::Serialize;

/// Error returned from service commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "CONFLICT",
///   "message": "Table t2 is already occupied"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown table, order, item or user
    NotFound,

    /// Input validation failed
    ValidationError,

    /// The operation violates a state rule
    Conflict,

    /// No session, or the role may not run this command
    AccessDenied,

    /// Persisted state could not be read or written
    StorageError,

    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors by their taxonomy kind.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match err.kind() {
            ErrorKind::Validation => ErrorCode::ValidationError,
            ErrorKind::Conflict => ErrorCode::Conflict,
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::AccessDenied => ErrorCode::AccessDenied,
            ErrorKind::External => ErrorCode::Internal,
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        // Log the actual error but return a generic message
        tracing::error!(error = %err, "Storage operation failed");
        ApiError::new(ErrorCode::StorageError, "Storage operation failed")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use nova_core::{OrderStatus, ValidationError};

    #[test]
    fn test_core_error_codes() {
        let err: ApiError = CoreError::TableNotFound("t9".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: ApiError = CoreError::OrderNotOpen {
            order_id: "o1".to_string(),
            current: OrderStatus::Paid,
        }
        .into();
        assert_eq!(err.code, ErrorCode::Conflict);

        let err: ApiError = CoreError::Validation(ValidationError::Required {
            field: "username".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err: ApiError = CoreError::NotAuthenticated.into();
        assert_eq!(err.code, ErrorCode::AccessDenied);
    }

    #[test]
    fn test_db_error_is_generic() {
        let err: ApiError = DbError::QueryFailed("disk I/O error".to_string()).into();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.message.contains("disk"));
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::new(ErrorCode::AccessDenied, "denied");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "ACCESS_DENIED");
        assert_eq!(json["message"], "denied");
    }
}
