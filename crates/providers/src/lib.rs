//! Provider implementations for SageAlpha.
//!
//! - [`AzureSearchProvider`] — ranked-document retrieval against an
//!   Azure AI Search index
//! - [`AzureOpenAiProvider`] — chat completions against an Azure OpenAI
//!   deployment
//! - [`NoopSearchProvider`] — always-empty retrieval, installed when
//!   search credentials are missing

pub mod azure_openai;
pub mod azure_search;
pub mod noop;

use std::sync::Arc;

use sagealpha_config::AppConfig;
use sagealpha_core::provider::{GenerationProvider, SearchProvider};
use tracing::warn;

pub use azure_openai::AzureOpenAiProvider;
pub use azure_search::AzureSearchProvider;
pub use noop::{NoopSearchProvider, UnconfiguredGenerationProvider};

/// Build the search provider from configuration.
///
/// Missing credentials degrade to the no-op provider instead of failing
/// startup: retrieval becomes always-empty and chat falls back to pure
/// model knowledge.
pub fn build_search_provider(config: &AppConfig) -> Arc<dyn SearchProvider> {
    if config.is_search_configured() {
        let search = &config.search;
        Arc::new(AzureSearchProvider::new(
            search.endpoint.clone().unwrap_or_default(),
            search.api_key.clone().unwrap_or_default(),
            search.index.clone(),
            search.semantic_config.clone(),
        ))
    } else {
        warn!("Missing Azure Search configuration — retrieval is disabled");
        Arc::new(NoopSearchProvider)
    }
}

/// Build the generation provider from configuration.
///
/// Missing credentials do not stop startup either: the stub provider
/// keeps the server up and fails each chat request with a configuration
/// error until credentials are supplied.
pub fn build_generation_provider(config: &AppConfig) -> Arc<dyn GenerationProvider> {
    if !config.is_generation_configured() {
        warn!("Missing Azure OpenAI configuration — chat requests will fail");
        return Arc::new(UnconfiguredGenerationProvider);
    }

    let generation = &config.generation;
    Arc::new(AzureOpenAiProvider::new(
        generation.endpoint.clone().unwrap_or_default(),
        generation.api_key.clone().unwrap_or_default(),
        generation.deployment.clone().unwrap_or_default(),
        generation.api_version.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sagealpha_config::{GenerationConfig, SearchConfig};

    #[test]
    fn unconfigured_search_falls_back_to_noop() {
        let provider = build_search_provider(&AppConfig::default());
        assert_eq!(provider.name(), "noop");
    }

    #[test]
    fn configured_search_builds_azure_provider() {
        let config = AppConfig {
            search: SearchConfig {
                endpoint: Some("https://example.search.windows.net".into()),
                api_key: Some("key".into()),
                ..SearchConfig::default()
            },
            ..AppConfig::default()
        };
        let provider = build_search_provider(&config);
        assert_eq!(provider.name(), "azure_search");
    }

    #[test]
    fn unconfigured_generation_falls_back_to_stub() {
        let provider = build_generation_provider(&AppConfig::default());
        assert_eq!(provider.name(), "unconfigured");
    }

    #[test]
    fn configured_generation_builds_azure_provider() {
        let config = AppConfig {
            generation: GenerationConfig {
                endpoint: Some("https://example.openai.azure.com".into()),
                api_key: Some("key".into()),
                deployment: Some("gpt-4o".into()),
                ..GenerationConfig::default()
            },
            ..AppConfig::default()
        };
        let provider = build_generation_provider(&config);
        assert_eq!(provider.name(), "azure_openai");
    }
}
