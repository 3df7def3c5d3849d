//! # Advisor Configuration Errors
//!
//! Request failures are reported as [`nova_core::AdvisoryError`] so the core
//! can absorb them. This module only covers loading configuration.

use thiserror::Error;

/// Errors loading or validating [`crate::AdvisorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is present but unusable.
    #[error("Invalid advisor config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::Invalid("temperature must be within 0.0..=2.0".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid advisor config: temperature must be within 0.0..=2.0"
        );
    }

    #[test]
    fn test_parse_error_conversion() {
        let parse_err = toml::from_str::<toml::Value>("[advisor").unwrap_err();
        let err: ConfigError = parse_err.into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
