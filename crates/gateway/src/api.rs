//! Route handlers and wire types for the gateway.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use sagealpha_core::document::Citation;
use sagealpha_core::error::{ChatError, ProviderError, StoreError};
use sagealpha_core::message::{Message, Role};
use sagealpha_store::ConversationSummary;

use crate::SharedState;

// ── Errors ────────────────────────────────────────────────────────────────

/// Errors a handler can surface to the HTTP caller.
///
/// Search failures never appear here — retrieval degrades silently
/// inside the engine. Only validation, lookup, and generation failures
/// reach the wire.
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Upstream(String),
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage => Self::BadRequest("Message must not be empty".into()),
            ChatError::Generation(ProviderError::NotConfigured(_)) => {
                Self::Upstream("Generation provider is not configured".into())
            }
            ChatError::Generation(e) => {
                error!(error = %e, "Generation failed");
                Self::Upstream("Answer generation failed".into())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(format!("Conversation not found: {id}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            Self::NotFound(m) => (StatusCode::NOT_FOUND, m),
            Self::Upstream(m) => (StatusCode::BAD_GATEWAY, m),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

// ── Wire types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChatRequest {
    message: String,
    /// Per-request override for the number of retrieved documents.
    #[serde(default)]
    top_k: Option<usize>,
}

#[derive(Serialize)]
struct MessageDto {
    id: String,
    role: &'static str,
    content: String,
    timestamp: String,
}

impl MessageDto {
    fn of(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            role: role_str(&message.role),
            content: message.content.clone(),
            timestamp: message.timestamp.to_rfc3339(),
        }
    }
}

fn role_str(role: &Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

#[derive(Serialize)]
pub struct ChatResponse {
    /// Id of the assistant message that answered this turn
    id: String,
    response: String,
    message: MessageDto,
    sources: Vec<Citation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_id: Option<String>,
}

#[derive(Deserialize)]
pub struct QueryRequest {
    query: String,
    #[serde(default)]
    top_k: Option<usize>,
}

#[derive(Deserialize)]
pub struct CreateConversationRequest {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize)]
pub struct RenameRequest {
    title: String,
}

#[derive(Serialize)]
pub struct ConversationDetailResponse {
    id: String,
    title: String,
    created_at: String,
    topic: String,
    messages: Vec<MessageDto>,
    section_count: usize,
}

#[derive(Deserialize)]
pub struct SearchDebugParams {
    q: String,
    #[serde(default)]
    top_k: Option<usize>,
}

// ── Handlers ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    search_configured: bool,
    generation_configured: bool,
}

pub async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        search_configured: state.search_configured,
        generation_configured: state.generation_configured,
    })
}

/// Turn on the single ongoing conversation.
pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let handle = state.single.handle();
    let outcome = state
        .engine
        .run_turn(&handle, &payload.message, payload.top_k)
        .await?;

    Ok(Json(ChatResponse {
        id: outcome.message.id.clone(),
        message: MessageDto::of(&outcome.message),
        response: outcome.answer,
        sources: outcome.citations,
        conversation_id: None,
    }))
}

/// Reset the ongoing conversation back to its seeded greeting.
pub async fn chat_reset_handler(State(state): State<SharedState>) -> Json<serde_json::Value> {
    state.single.reset().await;
    info!("Ongoing conversation reset");
    Json(json!({ "status": "cleared" }))
}

/// One-shot query: no conversation state, markdown-stripped answer.
pub async fn query_handler(
    State(state): State<SharedState>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let outcome = state
        .engine
        .one_shot(&payload.query, payload.top_k)
        .await?;

    Ok(Json(json!({
        "answer": outcome.answer,
        "sources": outcome.citations,
    })))
}

pub async fn list_conversations_handler(
    State(state): State<SharedState>,
) -> Json<serde_json::Value> {
    let conversations = state.store.list().await;
    Json(json!({ "conversations": conversations }))
}

pub async fn create_conversation_handler(
    State(state): State<SharedState>,
    Json(payload): Json<CreateConversationRequest>,
) -> (StatusCode, Json<ConversationSummary>) {
    let handle = state.store.create(payload.title.as_deref()).await;
    let conversation = handle.read().await;

    let summary = ConversationSummary {
        id: conversation.id.to_string(),
        title: conversation.title.clone(),
        created_at: conversation.created_at,
        message_count: conversation.messages.len(),
        section_count: conversation.sections.len(),
    };

    (StatusCode::CREATED, Json(summary))
}

pub async fn get_conversation_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationDetailResponse>, ApiError> {
    let handle = state.store.get(&id).await?;
    let conversation = handle.read().await;

    Ok(Json(ConversationDetailResponse {
        id: conversation.id.to_string(),
        title: conversation.title.clone(),
        created_at: conversation.created_at.to_rfc3339(),
        topic: conversation.current_topic.clone(),
        messages: conversation.messages.iter().map(MessageDto::of).collect(),
        section_count: conversation.sections.len(),
    }))
}

pub async fn rename_conversation_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<RenameRequest>,
) -> Result<Json<ConversationSummary>, ApiError> {
    let summary = state.store.rename(&id, &payload.title).await?;
    Ok(Json(summary))
}

/// Turn on a named conversation.
pub async fn conversation_chat_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let handle = state.store.get(&id).await?;
    let outcome = state
        .engine
        .run_turn(&handle, &payload.message, payload.top_k)
        .await?;

    Ok(Json(ChatResponse {
        id: outcome.message.id.clone(),
        message: MessageDto::of(&outcome.message),
        response: outcome.answer,
        sources: outcome.citations,
        conversation_id: Some(id),
    }))
}

/// Raw retrieval results for a query — inspection aid, no generation.
pub async fn search_debug_handler(
    State(state): State<SharedState>,
    Query(params): Query<SearchDebugParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Query parameter q must not be empty".into()));
    }

    let top_k = params.top_k.unwrap_or(state.engine.options().top_k);
    let documents = state
        .search
        .search(query, top_k)
        .await
        .map_err(|e| ApiError::Upstream(format!("Search failed: {e}")))?;

    Ok(Json(json!({
        "query": query,
        "count": documents.len(),
        "documents": documents,
    })))
}
