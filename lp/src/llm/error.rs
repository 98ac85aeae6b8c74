//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Response blocked by provider: {0}")]
    Blocked(String),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Unknown LLM provider: '{0}'. Supported: gemini, anthropic")]
    UnknownProvider(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Check if retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } => true,
            LlmError::ApiError { status, .. } => *status >= 500,
            LlmError::Network(_) => true,
            LlmError::EmptyResponse => true,
            LlmError::InvalidResponse(_)
            | LlmError::Blocked(_)
            | LlmError::UnknownProvider(_)
            | LlmError::Credential(_)
            | LlmError::Json(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(
            LlmError::RateLimited {
                retry_after: Duration::from_secs(60)
            }
            .is_retryable()
        );
        assert!(
            LlmError::ApiError {
                status: 503,
                message: "Unavailable".to_string()
            }
            .is_retryable()
        );

        // 4xx errors are the caller's fault
        assert!(
            !LlmError::ApiError {
                status: 400,
                message: "Bad request".to_string()
            }
            .is_retryable()
        );

        assert!(!LlmError::Blocked("SAFETY".to_string()).is_retryable());
        assert!(!LlmError::UnknownProvider("acme".to_string()).is_retryable());
        assert!(LlmError::EmptyResponse.is_retryable());
    }
}
