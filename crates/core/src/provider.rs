//! Provider traits — the abstractions over the external search index
//! and the chat-completion service.
//!
//! Both are potentially high-latency network calls. The chat engine
//! never holds a conversation lock while either is in flight.
//!
//! Implementations: Azure AI Search / Azure OpenAI in
//! `sagealpha-providers`, deterministic fakes in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::RetrievedDocument;
use crate::error::ProviderError;
use crate::message::Message;

/// Tuning knobs for a single generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature (0.0 = deterministic)
    #[serde(default)]
    pub temperature: f32,

    /// Nucleus sampling parameter
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

fn default_max_tokens() -> u32 {
    800
}
fn default_top_p() -> f32 {
    0.95
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            top_p: default_top_p(),
        }
    }
}

/// Ranked-document retrieval.
///
/// Errors from implementations are caught at the call site and treated
/// as "no documents" — retrieval failure never blocks generation.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "azure_search", "noop").
    fn name(&self) -> &str;

    /// Search the index, returning up to `top_k` scored documents.
    async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> std::result::Result<Vec<RetrievedDocument>, ProviderError>;
}

/// Chat-completion text generation.
///
/// Failures surface to the caller as a distinct error path; they are
/// not retried by the core.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "azure_openai").
    fn name(&self) -> &str;

    /// Generate an answer for the given ordered message sequence.
    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> std::result::Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.max_tokens, 800);
        assert!((opts.temperature - 0.0).abs() < f32::EPSILON);
        assert!((opts.top_p - 0.95).abs() < f32::EPSILON);
    }

    #[test]
    fn generation_options_deserialize_with_defaults() {
        let opts: GenerationOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.max_tokens, 800);
        assert!((opts.top_p - 0.95).abs() < f32::EPSILON);
    }
}
