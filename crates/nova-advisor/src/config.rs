//! # Advisor Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     NOVA_ADVISOR_API_KEY (or API_KEY)                                  │
//! │     NOVA_ADVISOR_MODEL, NOVA_ADVISOR_ENDPOINT,                         │
//! │     NOVA_ADVISOR_TIMEOUT_SECS                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/novaresto/advisor.toml (Linux)                           │
//! │     ~/Library/Application Support/com.novaresto.novaresto/... (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     gemini-3-flash-preview, temperature 0.7, no API key                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [advisor]
//! api_key = "AIza..."
//! model = "gemini-3-flash-preview"
//! temperature = 0.7
//! timeout_secs = 30
//! ```
//!
//! A missing API key is not an error: the advisor reports
//! `NotConfigured` and the views show the fixed "not configured" message.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> u64 {
    30
}

// =============================================================================
// Advisor Configuration
// =============================================================================

/// Settings for the Gemini advisory client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// API key. `None` (or blank) leaves the advisor unconfigured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL, without the `/models/...` suffix.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Sampling temperature for free-text advice (0.0 - 2.0).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Whole-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        AdvisorConfig {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
        }
    }
}

/// On-disk layout: everything lives under `[advisor]`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    advisor: AdvisorConfig,
}

impl AdvisorConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`advisor.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading advisor config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Advisor config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load advisor config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        Ok(file.advisor)
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        let file = ConfigFile {
            advisor: self.clone(),
        };
        Ok(toml::to_string_pretty(&file)?)
    }

    /// Checks ranges and URL shape. The API key is not required.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".into()));
        }

        if !self.endpoint.starts_with("https://") && !self.endpoint.starts_with("http://") {
            return Err(ConfigError::Invalid(format!(
                "endpoint must start with http:// or https://, got: {}",
                self.endpoint
            )));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature must be within 0.0..=2.0, got: {}",
                self.temperature
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// The API key, if one is set and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    /// Applies overrides read through `var`.
    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = var("NOVA_ADVISOR_API_KEY").or_else(|| var("API_KEY")) {
            debug!("Overriding advisor API key from environment");
            self.api_key = Some(key);
        }

        if let Some(model) = var("NOVA_ADVISOR_MODEL") {
            debug!(model = %model, "Overriding advisor model from environment");
            self.model = model;
        }

        if let Some(endpoint) = var("NOVA_ADVISOR_ENDPOINT") {
            self.endpoint = endpoint;
        }

        if let Some(timeout) = var("NOVA_ADVISOR_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring unparsable advisor timeout"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "novaresto", "novaresto")
            .map(|dirs| dirs.config_dir().join("advisor.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AdvisorConfig::default();
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert!(config.endpoint.contains("generativelanguage.googleapis.com"));
        assert_eq!(config.temperature, 0.7);
        assert!(!config.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_section() {
        let config = AdvisorConfig::from_toml(
            r#"
            [advisor]
            api_key = "abc"
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.api_key(), Some("abc"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.model, DEFAULT_MODEL);

        let empty = AdvisorConfig::from_toml("").unwrap();
        assert_eq!(empty, AdvisorConfig::default());
    }

    #[test]
    fn test_blank_api_key_is_unconfigured() {
        let config = AdvisorConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AdvisorConfig::default();
        config.apply_overrides(env(&[
            ("API_KEY", "fallback-key"),
            ("NOVA_ADVISOR_MODEL", "gemini-2.5-pro"),
            ("NOVA_ADVISOR_TIMEOUT_SECS", "12"),
        ]));
        assert_eq!(config.api_key(), Some("fallback-key"));
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.timeout_secs, 12);

        config.apply_overrides(env(&[
            ("NOVA_ADVISOR_API_KEY", "primary-key"),
            ("API_KEY", "fallback-key"),
            ("NOVA_ADVISOR_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(config.api_key(), Some("primary-key"));
        assert_eq!(config.timeout_secs, 12);
    }

    #[test]
    fn test_validation() {
        let mut config = AdvisorConfig::default();

        config.temperature = 3.0;
        assert!(config.validate().is_err());
        config.temperature = 0.7;

        config.endpoint = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
        config.endpoint = DEFAULT_ENDPOINT.to_string();

        config.timeout_secs = 0;
        assert!(config.validate().is_err());
        config.timeout_secs = 30;

        config.model = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("novaresto-advisor-missing.toml");
        let config = AdvisorConfig::load_or_default(Some(path));
        assert!(!config.model.is_empty());
    }

    #[test]
    fn test_toml_serialization() {
        let config = AdvisorConfig {
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        let text = config.to_toml().unwrap();
        assert!(text.contains("[advisor]"));
        assert_eq!(AdvisorConfig::from_toml(&text).unwrap(), config);
    }
}
