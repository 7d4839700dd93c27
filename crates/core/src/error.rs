//! Error types for the SageAlpha domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Conversation not found: {0}")]
    NotFound(String),
}

/// Errors produced while handling a single chat turn.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Rejected before any external call is made.
    #[error("Empty message")]
    EmptyMessage,

    /// The generation call failed; fatal to this request only.
    #[error("Generation failed: {0}")]
    Generation(#[source] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn store_not_found_carries_id() {
        let err = StoreError::NotFound("abc-123".into());
        assert!(err.to_string().contains("abc-123"));
    }

    #[test]
    fn chat_error_wraps_generation_failure() {
        let err = ChatError::Generation(ProviderError::Network("connection refused".into()));
        assert!(err.to_string().contains("Generation failed"));
    }
}
