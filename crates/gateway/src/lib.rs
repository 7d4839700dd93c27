//! HTTP API gateway for SageAlpha.
//!
//! Exposes the chat backend over REST:
//!
//! - `GET  /health`                      — liveness and provider status
//! - `POST /chat`                        — turn on the single ongoing conversation
//! - `POST /chat/reset`                  — reset the ongoing conversation
//! - `POST /query`                       — one-shot retrieval-augmented answer
//! - `GET  /conversations`               — list named conversations
//! - `POST /conversations`               — create a named conversation
//! - `GET  /conversations/{id}`          — full conversation detail
//! - `POST /conversations/{id}/rename`   — retitle a conversation
//! - `POST /conversations/{id}/chat`     — turn on a named conversation
//! - `GET  /search/debug`                — raw retrieval results for a query
//!
//! Built on Axum for high performance async HTTP.

pub mod api;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    routing::{get, post},
};
use sagealpha_chat::{ChatEngine, SEED_GREETING, TurnOptions};
use sagealpha_config::AppConfig;
use sagealpha_core::provider::{GenerationOptions, SearchProvider};
use sagealpha_store::{ConversationStore, SingleConversation};
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared application state for the gateway.
pub struct AppState {
    pub engine: ChatEngine,
    pub search: Arc<dyn SearchProvider>,
    pub store: ConversationStore,
    pub single: SingleConversation,
    pub search_configured: bool,
    pub generation_configured: bool,
}

pub type SharedState = Arc<AppState>;

/// Turn tunables derived from configuration.
pub fn turn_options(config: &AppConfig) -> TurnOptions {
    TurnOptions {
        top_k: config.search.top_k,
        relevance_threshold: config.search.relevance_threshold,
        memory_limit: config.chat.memory_limit,
        memory_max_chars: config.chat.memory_max_chars,
        context_max_chars: config.chat.context_max_chars,
        generation: GenerationOptions {
            max_tokens: config.generation.max_tokens,
            temperature: config.generation.temperature,
            top_p: config.generation.top_p,
        },
    }
}

/// Build the Axum router with all gateway routes.
///
/// Layers applied: permissive CORS (the web frontend is served from a
/// different origin), a 1 MB request body limit, and HTTP trace logging.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(api::health_handler))
        .route("/chat", post(api::chat_handler))
        .route("/chat/reset", post(api::chat_reset_handler))
        .route("/query", post(api::query_handler))
        .route("/conversations", get(api::list_conversations_handler))
        .route("/conversations", post(api::create_conversation_handler))
        .route("/conversations/{id}", get(api::get_conversation_handler))
        .route(
            "/conversations/{id}/rename",
            post(api::rename_conversation_handler),
        )
        .route(
            "/conversations/{id}/chat",
            post(api::conversation_chat_handler),
        )
        .route("/search/debug", get(api::search_debug_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the shared state from configuration.
///
/// Missing credentials never stop startup: search degrades to
/// always-empty retrieval, generation to a stub that fails each chat
/// request with a configuration error.
pub fn build_state(config: &AppConfig) -> SharedState {
    let search = sagealpha_providers::build_search_provider(config);
    let generation = sagealpha_providers::build_generation_provider(config);

    let engine =
        ChatEngine::new(search.clone(), generation).with_options(turn_options(config));

    Arc::new(AppState {
        engine,
        search,
        store: ConversationStore::new(),
        single: SingleConversation::new(SEED_GREETING),
        search_configured: config.is_search_configured(),
        generation_configured: config.is_generation_configured(),
    })
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let state = build_state(&config);
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
