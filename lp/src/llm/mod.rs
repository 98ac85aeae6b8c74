//! LLM Client module for learnpath
//!
//! The advisor's generation collaborator: a provider-agnostic client trait,
//! HTTP implementations for Gemini and Anthropic, and the `generate` helper
//! the wizard calls with a rendered prompt.

use std::sync::Arc;

use reqwest::header::HeaderMap;
use tracing::{debug, info};

mod anthropic;
pub mod client;
mod error;
mod gemini;
mod types;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use types::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};

use crate::config::LlmConfig;

/// Maximum number of retries for transient errors
pub(crate) const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
pub(crate) const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 500 | 502 | 503 | 504 | 529)
}

/// Seconds from a `retry-after` header, 60 when absent or unparseable
pub(crate) fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(60)
}

/// Create an LLM client based on the provider specified in config
///
/// Supports "gemini" and "anthropic" providers.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiClient::from_config(config)?)),
        "anthropic" => Ok(Arc::new(AnthropicClient::from_config(config)?)),
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::UnknownProvider(other.to_string()))
        }
    }
}

/// Send one prompt and return the trimmed response text
///
/// An empty response counts as a failure so callers never commit blank
/// content into the session.
pub async fn generate(llm: &dyn LlmClient, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
    debug!(provider = %llm.provider(), prompt_len = prompt.len(), "generate: called");
    let response = llm.complete(CompletionRequest::new(prompt, max_tokens)).await?;

    info!(
        provider = %llm.provider(),
        input_tokens = response.usage.input_tokens,
        output_tokens = response.usage.output_tokens,
        stop_reason = ?response.stop_reason,
        "generate: completed"
    );

    match response.content.map(|t| t.trim().to_string()) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => {
            debug!("generate: empty response");
            Err(LlmError::EmptyResponse)
        }
    }
}
