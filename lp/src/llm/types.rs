//! LLM request/response types for learnpath
//!
//! The advisor only ever sends one templated prompt and reads back text, so
//! these types are a single-turn subset that both providers can serve.

use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The rendered prompt text
    pub prompt: String,

    /// Max tokens for response (capped by the client's configured maximum)
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a request for one rendered prompt
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        let prompt = prompt.into();
        debug!(prompt_len = prompt.len(), %max_tokens, "CompletionRequest::new: called");
        Self {
            prompt,
            max_tokens,
        }
    }
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,

    /// Why the model stopped
    pub stop_reason: StopReason,

    /// Token usage for logging
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// A finished text response, mostly useful for mocks
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    /// The provider withheld the output (safety, recitation, ...)
    Blocked(String),
}

impl StopReason {
    /// Parse from Anthropic API stop_reason string
    pub fn from_anthropic(s: &str) -> Self {
        debug!(%s, "StopReason::from_anthropic: called");
        match s {
            "max_tokens" => StopReason::MaxTokens,
            "stop_sequence" => StopReason::StopSequence,
            _ => StopReason::EndTurn,
        }
    }

    /// Parse from Gemini finishReason string
    pub fn from_gemini(s: &str) -> Self {
        debug!(%s, "StopReason::from_gemini: called");
        match s {
            "STOP" | "FINISH_REASON_UNSPECIFIED" => StopReason::EndTurn,
            "MAX_TOKENS" => StopReason::MaxTokens,
            other => StopReason::Blocked(other.to_string()),
        }
    }
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_new() {
        let req = CompletionRequest::new("Hello", 100);
        assert_eq!(req.prompt, "Hello");
        assert_eq!(req.max_tokens, 100);
    }

    #[test]
    fn test_stop_reason_from_anthropic() {
        assert_eq!(StopReason::from_anthropic("end_turn"), StopReason::EndTurn);
        assert_eq!(StopReason::from_anthropic("max_tokens"), StopReason::MaxTokens);
        assert_eq!(StopReason::from_anthropic("stop_sequence"), StopReason::StopSequence);
        assert_eq!(StopReason::from_anthropic("unknown"), StopReason::EndTurn);
    }

    #[test]
    fn test_stop_reason_from_gemini() {
        assert_eq!(StopReason::from_gemini("STOP"), StopReason::EndTurn);
        assert_eq!(StopReason::from_gemini("MAX_TOKENS"), StopReason::MaxTokens);
        assert_eq!(StopReason::from_gemini("SAFETY"), StopReason::Blocked("SAFETY".to_string()));
    }
}
