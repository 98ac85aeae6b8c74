//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// This is the advisor's only view of the hosted text-generation service.
/// The wizard never keeps a conversation: every prompt carries the full
/// session context it needs.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Provider name for logging
    fn provider(&self) -> &str;
}
