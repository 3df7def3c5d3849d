//! # Advisory Seam
//!
//! Contract with the network-backed advisory collaborator, and the
//! absorption rules that keep its failures away from the views.
//!
//! ```text
//! ┌──────────────┐  ask_advisor(prompt, ctx)   ┌──────────────────────┐
//! │  Service     │ ──────────────────────────► │ dyn AdvisoryService  │
//! │  command     │                             │  (Gemini, fake, ...) │
//! │              │ ◄── String (never an Err) ─ │                      │
//! └──────────────┘                             └──────────────────────┘
//!
//!   Ok(text)                  ──► text
//!   Err(NotConfigured)        ──► NOT_CONFIGURED_MESSAGE
//!   Err(anything else)        ──► ADVICE_FAILED_MESSAGE
//!   forecast Err(_)           ──► StockForecast::fallback()
//! ```
//!
//! The restaurant state is only read (as a JSON snapshot) before the call;
//! nothing is mutated while a request is pending.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::error::AdvisoryError;

pub const NOT_CONFIGURED_MESSAGE: &str =
    "API Key not configured. Please add your key to use AI features.";
pub const ADVICE_FAILED_MESSAGE: &str =
    "Failed to fetch AI insights. Please check your connection or try again.";
pub const FORECAST_FAILED_SUMMARY: &str = "Error calculating predictions.";

/// Structured stock forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockForecast {
    pub summary: String,
    #[serde(default)]
    pub alerts: Vec<String>,
}

impl StockForecast {
    pub fn fallback() -> Self {
        StockForecast {
            summary: FORECAST_FAILED_SUMMARY.to_string(),
            alerts: Vec::new(),
        }
    }
}

/// The advisory collaborator.
#[async_trait]
pub trait AdvisoryService: Send + Sync {
    /// Free-text business advice for `prompt`, given a state snapshot.
    async fn advise(
        &self,
        prompt: &str,
        context: &serde_json::Value,
    ) -> Result<String, AdvisoryError>;

    /// Next-week stock forecast for an inventory snapshot.
    async fn predict_stock(
        &self,
        inventory: &serde_json::Value,
    ) -> Result<StockForecast, AdvisoryError>;
}

/// Asks for advice. Always yields displayable text.
pub async fn ask_advisor(
    service: &dyn AdvisoryService,
    prompt: &str,
    context: &serde_json::Value,
) -> String {
    match service.advise(prompt, context).await {
        Ok(text) => text,
        Err(AdvisoryError::NotConfigured) => NOT_CONFIGURED_MESSAGE.to_string(),
        Err(e) => {
            warn!(error = %e, "Advisory request failed");
            ADVICE_FAILED_MESSAGE.to_string()
        }
    }
}

/// Asks for a stock forecast. Failures yield [`StockForecast::fallback`].
pub async fn predict_needs(
    service: &dyn AdvisoryService,
    inventory: &serde_json::Value,
) -> StockForecast {
    match service.predict_stock(inventory).await {
        Ok(forecast) => forecast,
        Err(e) => {
            warn!(error = %e, "Stock forecast failed");
            StockForecast::fallback()
        }
    }
}
