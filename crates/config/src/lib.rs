//! Configuration loading, validation, and management for SageAlpha.
//!
//! Loads configuration from `~/.sagealpha/config.toml` with environment
//! variable overrides for provider credentials. Validates all settings
//! at startup.
//!
//! Missing search credentials are not fatal: the retrieval path degrades
//! to always-empty results. Missing generation credentials keep the
//! server up but fail chat requests with a configuration error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.sagealpha/config.toml`.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Chat-completion provider settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Search index provider settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Chat core tunables
    #[serde(default)]
    pub chat: ChatConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("generation", &self.generation)
            .field("search", &self.search)
            .field("chat", &self.chat)
            .field("gateway", &self.gateway)
            .finish()
    }
}

/// Azure OpenAI chat-completion settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Service endpoint, e.g. `https://myresource.openai.azure.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Deployment (model) name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

fn default_api_version() -> String {
    "2023-05-15".into()
}
fn default_max_tokens() -> u32 {
    800
}
fn default_top_p() -> f32 {
    0.95
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            deployment: None,
            api_version: default_api_version(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            top_p: default_top_p(),
        }
    }
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .finish()
    }
}

/// Azure AI Search settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Service endpoint, e.g. `https://myresource.search.windows.net`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_index")]
    pub index: String,

    /// Semantic ranking configuration name; plain keyword search when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_config: Option<String>,

    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum score a retrieved document must meet to enter the context
    #[serde(default = "default_relevance_threshold")]
    pub relevance_threshold: f32,
}

fn default_index() -> String {
    "azureblob-index".into()
}
fn default_top_k() -> usize {
    5
}
fn default_relevance_threshold() -> f32 {
    0.35
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            index: default_index(),
            semantic_config: None,
            top_k: default_top_k(),
            relevance_threshold: default_relevance_threshold(),
        }
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("index", &self.index)
            .field("semantic_config", &self.semantic_config)
            .field("top_k", &self.top_k)
            .field("relevance_threshold", &self.relevance_threshold)
            .finish()
    }
}

/// Session memory and context sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// How many prior Q&A sections feed the session memory
    #[serde(default = "default_memory_limit")]
    pub memory_limit: usize,

    /// Hard cap on the rendered session memory, in characters
    #[serde(default = "default_memory_max_chars")]
    pub memory_max_chars: usize,

    /// Hard cap on the rendered retrieval context, in characters
    #[serde(default = "default_context_max_chars")]
    pub context_max_chars: usize,
}

fn default_memory_limit() -> usize {
    5
}
fn default_memory_max_chars() -> usize {
    1500
}
fn default_context_max_chars() -> usize {
    6000
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            memory_limit: default_memory_limit(),
            memory_max_chars: default_memory_max_chars(),
            context_max_chars: default_context_max_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.sagealpha/config.toml).
    ///
    /// Environment variables take priority over the file:
    /// - `AZURE_OPENAI_ENDPOINT` / `AZURE_OPENAI_API_KEY` /
    ///   `AZURE_OPENAI_DEPLOYMENT` / `AZURE_OPENAI_API_VERSION`
    /// - `AZURE_SEARCH_ENDPOINT` / `AZURE_SEARCH_KEY` /
    ///   `AZURE_SEARCH_INDEX` / `AZURE_SEARCH_SEMANTIC_CONFIG`
    /// - `SAGEALPHA_PORT`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        if let Some(v) = env("AZURE_OPENAI_ENDPOINT") {
            self.generation.endpoint = Some(v);
        }
        if let Some(v) = env("AZURE_OPENAI_API_KEY") {
            self.generation.api_key = Some(v);
        }
        if let Some(v) = env("AZURE_OPENAI_DEPLOYMENT") {
            self.generation.deployment = Some(v);
        }
        if let Some(v) = env("AZURE_OPENAI_API_VERSION") {
            self.generation.api_version = v;
        }

        if let Some(v) = env("AZURE_SEARCH_ENDPOINT") {
            self.search.endpoint = Some(v);
        }
        if let Some(v) = env("AZURE_SEARCH_KEY") {
            self.search.api_key = Some(v);
        }
        if let Some(v) = env("AZURE_SEARCH_INDEX") {
            self.search.index = v;
        }
        if let Some(v) = env("AZURE_SEARCH_SEMANTIC_CONFIG") {
            self.search.semantic_config = Some(v);
        }

        if let Some(port) = env("SAGEALPHA_PORT").and_then(|v| v.parse().ok()) {
            self.gateway.port = port;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".sagealpha")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.temperature < 0.0 || self.generation.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.generation.top_p <= 0.0 || self.generation.top_p > 1.0 {
            return Err(ConfigError::ValidationError(
                "generation.top_p must be in (0.0, 1.0]".into(),
            ));
        }

        if self.search.relevance_threshold < 0.0 {
            return Err(ConfigError::ValidationError(
                "search.relevance_threshold must be >= 0".into(),
            ));
        }

        Ok(())
    }

    /// Whether the search provider has everything it needs.
    pub fn is_search_configured(&self) -> bool {
        self.search.endpoint.is_some() && self.search.api_key.is_some() && !self.search.index.is_empty()
    }

    /// Whether the generation provider has everything it needs.
    pub fn is_generation_configured(&self) -> bool {
        self.generation.endpoint.is_some()
            && self.generation.api_key.is_some()
            && self.generation.deployment.is_some()
    }

    /// Generate a default config TOML string (for the `onboard` command).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
