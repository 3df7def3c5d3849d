//! # Configuration State
//!
//! Stores service configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`NOVA_*`)
//! 2. Defaults (this file)
//!
//! The advisory client reads its own `[advisor]` file; see `nova-advisor`.
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.
//! The currency symbol that changes at runtime lives in the restaurant
//! state, not here.

use nova_core::validation::validate_tax_rate_bps;
use nova_core::{TaxRate, DEFAULT_CURRENCY_SYMBOL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// How stored credentials are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialMode {
    /// Exact match against stored PINs
    #[default]
    Plaintext,

    /// Argon2 PHC strings; plaintext PINs are converted at boot
    Argon2,
}

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Restaurant name (dashboard header, tickets)
    pub restaurant_name: String,

    /// Currency symbol for a fresh install. Once set in Settings the
    /// persisted symbol wins.
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// VAT rate in basis points, included in menu prices
    /// e.g., 2000 = 20%
    pub vat_rate_bps: u32,

    /// Database file. `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,

    pub credential_mode: CredentialMode,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Restaurant: "NovaResto"
    /// - Currency: € with 2 decimals
    /// - VAT: 20% inclusive
    /// - Credentials: plaintext PINs
    fn default() -> Self {
        ConfigState {
            restaurant_name: "NovaResto".to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            currency_decimals: 2,
            vat_rate_bps: TaxRate::default().bps(),
            database_path: None,
            credential_mode: CredentialMode::Plaintext,
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `NOVA_RESTAURANT_NAME`: Override restaurant name
    /// - `NOVA_CURRENCY`: Fresh-install currency symbol (e.g., "$")
    /// - `NOVA_VAT_RATE`: VAT rate in percent (e.g., "20" or "5.5")
    /// - `NOVA_DB_PATH`: Database file path
    /// - `NOVA_CREDENTIAL_MODE`: `plaintext` or `argon2`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(name) = var("NOVA_RESTAURANT_NAME") {
            config.restaurant_name = name;
        }

        if let Some(symbol) = var("NOVA_CURRENCY") {
            config.currency_symbol = symbol;
        }

        if let Some(rate) = var("NOVA_VAT_RATE") {
            match parse_vat_rate(&rate) {
                Some(bps) => config.vat_rate_bps = bps,
                None => warn!(value = %rate, "Ignoring invalid NOVA_VAT_RATE"),
            }
        }

        if let Some(path) = var("NOVA_DB_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(mode) = var("NOVA_CREDENTIAL_MODE") {
            match mode.trim().to_lowercase().as_str() {
                "plaintext" => config.credential_mode = CredentialMode::Plaintext,
                "argon2" => config.credential_mode = CredentialMode::Argon2,
                _ => warn!(mode = %mode, "Unknown credential mode in environment"),
            }
        }

        config
    }

    pub fn vat_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.vat_rate_bps)
    }

    /// Formats a cent amount the way the tickets show it: `12.50 €`.
    pub fn format_currency(&self, cents: i64, symbol: &str) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = (cents / divisor).abs();
        let frac = (cents % divisor).abs();
        let sign = if cents < 0 { "-" } else { "" };

        if self.currency_decimals > 0 {
            format!(
                "{}{}.{:0width$} {}",
                sign,
                whole,
                frac,
                symbol,
                width = self.currency_decimals as usize
            )
        } else {
            format!("{}{} {}", sign, whole, symbol)
        }
    }
}

/// ISO code for the symbols offered in Settings.
pub fn currency_code(symbol: &str) -> &'static str {
    match symbol {
        "$" => "USD",
        "£" => "GBP",
        "DH" => "MAD",
        _ => "EUR",
    }
}

fn parse_vat_rate(value: &str) -> Option<u32> {
    let pct = value.trim().trim_end_matches('%').parse::<f64>().ok()?;
    if !pct.is_finite() || pct < 0.0 {
        return None;
    }
    let bps = TaxRate::from_percentage(pct).bps();
    validate_tax_rate_bps(bps).ok()?;
    Some(bps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_format_currency_positive() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(1250, "€"), "12.50 €");
        assert_eq!(config.format_currency(100, "$"), "1.00 $");
        assert_eq!(config.format_currency(1, "€"), "0.01 €");
        assert_eq!(config.format_currency(0, "DH"), "0.00 DH");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(-1234, "€"), "-12.34 €");
        assert_eq!(config.format_currency(-5, "€"), "-0.05 €");
    }

    #[test]
    fn test_env_overrides() {
        let config = ConfigState::from_lookup(lookup(&[
            ("NOVA_RESTAURANT_NAME", "Chez Nova"),
            ("NOVA_CURRENCY", "$"),
            ("NOVA_VAT_RATE", "5.5"),
            ("NOVA_DB_PATH", "/tmp/nova.db"),
            ("NOVA_CREDENTIAL_MODE", "Argon2"),
        ]));
        assert_eq!(config.restaurant_name, "Chez Nova");
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.vat_rate_bps, 550);
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/nova.db")));
        assert_eq!(config.credential_mode, CredentialMode::Argon2);
    }

    #[test]
    fn test_invalid_env_values_keep_defaults() {
        let config = ConfigState::from_lookup(lookup(&[
            ("NOVA_VAT_RATE", "lots"),
            ("NOVA_CREDENTIAL_MODE", "md5"),
        ]));
        assert_eq!(config.vat_rate_bps, 2000);
        assert_eq!(config.credential_mode, CredentialMode::Plaintext);

        let config = ConfigState::from_lookup(lookup(&[("NOVA_VAT_RATE", "150")]));
        assert_eq!(config.vat_rate_bps, 2000);
    }

    #[test]
    fn test_currency_codes() {
        assert_eq!(currency_code("€"), "EUR");
        assert_eq!(currency_code("$"), "USD");
        assert_eq!(currency_code("£"), "GBP");
        assert_eq!(currency_code("DH"), "MAD");
    }
}
