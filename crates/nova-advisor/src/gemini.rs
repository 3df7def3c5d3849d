//! # Gemini Advisor
//!
//! [`AdvisoryService`] over the Gemini `generateContent` endpoint.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  advise(prompt, context)                                                │
//! │       │  no API key? ──────────────────────────► Err(NotConfigured)    │
//! │       ▼                                                                 │
//! │  contents: "Context: ... {context JSON}. User Query: {prompt}"         │
//! │  systemInstruction: NovaResto AI persona                               │
//! │  generationConfig: { temperature }                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  POST {endpoint}/models/{model}:generateContent  (x-goog-api-key)      │
//! │       │                                                                 │
//! │       ├── timeout          ──► Err(Timeout)                            │
//! │       ├── transport error  ──► Err(Http)                               │
//! │       ├── non-2xx / error  ──► Err(Response)                           │
//! │       └── candidates[0].content.parts[0].text ──► Ok(text)             │
//! │                                                                         │
//! │  predict_stock(inventory)                                               │
//! │       same call with responseMimeType=application/json and a           │
//! │       {summary, alerts[]} responseSchema; the text is parsed as JSON   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The key travels only in a sensitive header. Transport errors are
//! stripped of their URL before they are returned or logged.

use async_trait::async_trait;
use nova_core::{AdvisoryError, AdvisoryService, StockForecast};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::AdvisorConfig;

const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-goog-api-key");

const SYSTEM_INSTRUCTION: &str = "You are NovaResto AI, a specialist in restaurant \
optimization, cost control, and staff management. Provide concise, actionable advice \
based on LS Retail best practices.";

// =============================================================================
// Client
// =============================================================================

/// Gemini-backed advisory client.
#[derive(Debug, Clone)]
pub struct GeminiAdvisor {
    client: reqwest::Client,
    config: AdvisorConfig,
}

impl GeminiAdvisor {
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisoryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdvisoryError::Http(e.to_string()))?;
        Ok(GeminiAdvisor { client, config })
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model,
        )
    }

    fn build_request(
        &self,
        api_key: &str,
        body: &GeminiRequest,
    ) -> Result<reqwest::Request, AdvisoryError> {
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| AdvisoryError::Http("API key is not a valid header value".to_string()))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, key);

        self.client
            .post(self.build_url())
            .headers(headers)
            .json(body)
            .build()
            .map_err(transport_error)
    }

    fn advice_request(&self, prompt: &str, context: &serde_json::Value) -> GeminiRequest {
        let text = format!(
            "Context: You are a restaurant management expert. Here is the current data: {}. \
             User Query: {}",
            context, prompt
        );
        GeminiRequest {
            contents: vec![GeminiContent::user(text)],
            system_instruction: Some(GeminiSystemInstruction {
                parts: vec![GeminiPart {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            }),
            generation_config: GeminiGenerationConfig {
                temperature: Some(self.config.temperature),
                response_mime_type: None,
                response_schema: None,
            },
        }
    }

    fn forecast_request(&self, inventory: &serde_json::Value) -> GeminiRequest {
        let text = format!(
            "Predict stock needs for the next week based on this inventory: {}. \
             Format as a brief summary.",
            inventory
        );
        GeminiRequest {
            contents: vec![GeminiContent::user(text)],
            system_instruction: None,
            generation_config: GeminiGenerationConfig {
                temperature: None,
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(forecast_schema()),
            },
        }
    }

    /// Sends `body` and returns the first candidate's text.
    async fn generate(&self, body: &GeminiRequest) -> Result<String, AdvisoryError> {
        let api_key = self.config.api_key().ok_or(AdvisoryError::NotConfigured)?;
        let request = self.build_request(api_key, body)?;

        debug!(model = %self.config.model, "Sending advisory request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            warn!(%status, "Advisory service returned an error status");
            return Err(AdvisoryError::Response(format!("HTTP {}: {}", status, text)));
        }

        extract_text(&text)
    }
}

#[async_trait]
impl AdvisoryService for GeminiAdvisor {
    async fn advise(
        &self,
        prompt: &str,
        context: &serde_json::Value,
    ) -> Result<String, AdvisoryError> {
        let body = self.advice_request(prompt, context);
        self.generate(&body).await
    }

    async fn predict_stock(
        &self,
        inventory: &serde_json::Value,
    ) -> Result<StockForecast, AdvisoryError> {
        let body = self.forecast_request(inventory);
        let text = self.generate(&body).await?;
        parse_forecast(&text)
    }
}

fn transport_error(err: reqwest::Error) -> AdvisoryError {
    if err.is_timeout() {
        AdvisoryError::Timeout
    } else {
        AdvisoryError::Http(err.without_url().to_string())
    }
}

fn forecast_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "alerts": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["summary", "alerts"]
    })
}

/// Pulls `candidates[0].content.parts[0].text` out of a response body.
fn extract_text(body: &str) -> Result<String, AdvisoryError> {
    let parsed: GeminiResponse =
        serde_json::from_str(body).map_err(|e| AdvisoryError::Serialization(e.to_string()))?;

    if let Some(error) = parsed.error {
        return Err(AdvisoryError::Response(format!(
            "Gemini API error: {}",
            error.message
        )));
    }

    parsed
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AdvisoryError::Response("No content in response".to_string()))
}

fn parse_forecast(text: &str) -> Result<StockForecast, AdvisoryError> {
    serde_json::from_str(text.trim()).map_err(|e| AdvisoryError::Serialization(e.to_string()))
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn user(text: String) -> Self {
        GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContentResponse,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
