//! # Assistant Commands
//!
//! Free-text business advice. The reply is always displayable text: an
//! unconfigured key or a failed request yields a fixed message instead of
//! an error.

use nova_core::advisory::ask_advisor;
use nova_core::Operation;
use serde::Serialize;
use tracing::debug;

use crate::app::App;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub prompt: String,
    pub text: String,
}

pub async fn ask_assistant(app: &App, prompt: &str) -> ApiResult<AssistantReply> {
    app.authorize(Operation::AskAssistant)?;

    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::validation("Ask a question first"));
    }
    debug!(prompt_len = prompt.len(), "ask_assistant command");

    // Snapshot first; the lock is never held across the request.
    let context = app.restaurant().with_restaurant(|r| r.advisory_context());
    let text = ask_advisor(app.advisor(), prompt, &context).await;

    Ok(AssistantReply {
        prompt: prompt.to_string(),
        text,
    })
}
