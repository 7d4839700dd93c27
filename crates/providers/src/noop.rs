//! No-op search provider — installed when search credentials are missing.
//!
//! Always returns an empty result set, which the chat engine treats as
//! "answer from model knowledge". Keeps the system up when the search
//! service is unconfigured.

use async_trait::async_trait;
use sagealpha_core::document::RetrievedDocument;
use sagealpha_core::error::ProviderError;
use sagealpha_core::message::Message;
use sagealpha_core::provider::{GenerationOptions, GenerationProvider, SearchProvider};

pub struct NoopSearchProvider;

#[async_trait]
impl SearchProvider for NoopSearchProvider {
    fn name(&self) -> &str {
        "noop"
    }

    async fn search(
        &self,
        _query: &str,
        _top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, ProviderError> {
        Ok(Vec::new())
    }
}

/// Installed when generation credentials are missing. The server stays
/// up; every chat request fails with a configuration error instead.
pub struct UnconfiguredGenerationProvider;

#[async_trait]
impl GenerationProvider for UnconfiguredGenerationProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn complete(
        &self,
        _messages: &[Message],
        _options: &GenerationOptions,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::NotConfigured(
            "Azure OpenAI endpoint, api_key, and deployment are required".into(),
        ))
    }
}
