//! # Validation Module
//!
//! Input validation for NovaResto engines.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation                                                 │
//! │  └── Form checks, immediate feedback                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service command                                              │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engines                                                      │
//! │  └── State invariants (conflicts, not-found)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nova_core::validation::{validate_quantity, validate_table_capacity};
//!
//! assert!(validate_quantity(2).is_ok());
//! assert!(validate_table_capacity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_CURRENCY_SYMBOL_LEN, MAX_ITEM_QUANTITY, MAX_TABLE_CAPACITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// Applies to the accumulated quantity too: adding 1 to a 999 line fails.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed.
///
/// ## Example
/// ```rust
/// use nova_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1250).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock adjustment delta.
///
/// Any finite value is accepted; the ledger clamps the result at zero.
pub fn validate_stock_delta(delta: f64) -> ValidationResult<()> {
    if !delta.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "delta".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    Ok(())
}

/// Validates a table's seating capacity (1-50).
pub fn validate_table_capacity(capacity: u32) -> ValidationResult<()> {
    if capacity == 0 || capacity > MAX_TABLE_CAPACITY {
        return Err(ValidationError::OutOfRange {
            field: "capacity".to_string(),
            min: 1,
            max: MAX_TABLE_CAPACITY as i64,
        });
    }

    Ok(())
}

/// Validates a table number (>= 1).
pub fn validate_table_number(number: u32) -> ValidationResult<()> {
    if number == 0 {
        return Err(ValidationError::OutOfRange {
            field: "number".to_string(),
            min: 1,
            max: u32::MAX as i64,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0-10000).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a login name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 50 characters
/// - No whitespace inside
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }

    if username.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (user or inventory line).
pub fn validate_display_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a contact email. Only the shape `local@domain.tld` is checked.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    };

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(())
}

/// Validates a credential before it is stored.
pub fn validate_credential(credential: &str) -> ValidationResult<()> {
    if credential.is_empty() {
        return Err(ValidationError::Required {
            field: "credential".to_string(),
        });
    }

    Ok(())
}

/// Validates a currency symbol ("€", "$", "CHF").
pub fn validate_currency_symbol(symbol: &str) -> ValidationResult<()> {
    let symbol = symbol.trim();

    if symbol.is_empty() {
        return Err(ValidationError::Required {
            field: "currency".to_string(),
        });
    }

    if symbol.chars().count() > MAX_CURRENCY_SYMBOL_LEN {
        return Err(ValidationError::TooLong {
            field: "currency".to_string(),
            max: MAX_CURRENCY_SYMBOL_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_stock_delta() {
        assert!(validate_stock_delta(-1000.0).is_ok());
        assert!(validate_stock_delta(0.5).is_ok());
        assert!(validate_stock_delta(f64::NAN).is_err());
        assert!(validate_stock_delta(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_table_capacity() {
        assert!(validate_table_capacity(1).is_ok());
        assert!(validate_table_capacity(50).is_ok());
        assert!(validate_table_capacity(0).is_err());
        assert!(validate_table_capacity(51).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username("jean manager").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("admin@novaresto.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("admin").is_err());
        assert!(validate_email("@novaresto.com").is_err());
        assert!(validate_email("admin@localhost").is_err());
    }

    #[test]
    fn test_validate_currency_symbol() {
        assert!(validate_currency_symbol("€").is_ok());
        assert!(validate_currency_symbol("CHF").is_ok());
        assert!(validate_currency_symbol(" ").is_err());
        assert!(validate_currency_symbol("EUROS").is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(2000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }
}
