//! # nova-advisor: Advisory Service Client
//!
//! The only network call in NovaResto: business advice and stock forecasts
//! from Gemini, behind the core [`nova_core::AdvisoryService`] trait.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   nova-service ── ask_advisor / predict_needs (nova-core) ──┐          │
//! │                   fixed fallbacks on any Err                 │          │
//! │                                                              ▼          │
//! │   ┌──────────────────────────────────────────────────────────────────┐ │
//! │   │                 nova-advisor (THIS CRATE)                        │ │
//! │   │                                                                  │ │
//! │   │   AdvisorConfig ──► GeminiAdvisor ──► reqwest ──► Gemini API     │ │
//! │   │   ([advisor] TOML      impl AdvisoryService                       │ │
//! │   │    + env overrides)                                              │ │
//! │   └──────────────────────────────────────────────────────────────────┘ │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use nova_advisor::{AdvisorConfig, GeminiAdvisor};
//! use nova_core::advisory::ask_advisor;
//!
//! let advisor = GeminiAdvisor::new(AdvisorConfig::load_or_default(None))?;
//! let text = ask_advisor(&advisor, "How can I reduce waste?", &context).await;
//! ```

pub mod config;
pub mod error;
pub mod gemini;

pub use config::AdvisorConfig;
pub use error::{ConfigError, ConfigResult};
pub use gemini::GeminiAdvisor;
