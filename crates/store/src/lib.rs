//! In-memory conversation store.
//!
//! Process-wide shared state; conversations are lost on restart (an
//! accepted limitation, not a bug). The outer map lock guards insert
//! and lookup only — each conversation carries its own lock, so turns
//! on distinct conversation ids never serialize against each other.
//!
//! The chat engine must not hold a conversation lock across provider
//! calls; it locks briefly before and after.

pub mod single;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sagealpha_core::error::StoreError;
use sagealpha_core::message::Conversation;
use serde::Serialize;
use tokio::sync::RwLock;

pub use single::SingleConversation;

/// A shared, individually-lockable conversation.
pub type ConversationHandle = Arc<RwLock<Conversation>>;

const DEFAULT_TITLE: &str = "New chat";

/// Lightweight view of a conversation for listings.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub message_count: usize,
    pub section_count: usize,
}

impl ConversationSummary {
    fn of(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id.to_string(),
            title: conversation.title.clone(),
            created_at: conversation.created_at,
            message_count: conversation.messages.len(),
            section_count: conversation.sections.len(),
        }
    }
}

/// Directory of named conversations, keyed by id.
#[derive(Default)]
pub struct ConversationStore {
    conversations: RwLock<HashMap<String, ConversationHandle>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new conversation. Blank titles get the default.
    pub async fn create(&self, title: Option<&str>) -> ConversationHandle {
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => DEFAULT_TITLE,
        };

        let conversation = Conversation::new(title);
        let id = conversation.id.to_string();
        let handle = Arc::new(RwLock::new(conversation));

        self.conversations
            .write()
            .await
            .insert(id, handle.clone());

        handle
    }

    /// Look up a conversation by id.
    pub async fn get(&self, id: &str) -> Result<ConversationHandle, StoreError> {
        self.conversations
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Rename a conversation. A blank new title leaves the existing one
    /// unchanged.
    pub async fn rename(
        &self,
        id: &str,
        new_title: &str,
    ) -> Result<ConversationSummary, StoreError> {
        let handle = self.get(id).await?;
        let mut conversation = handle.write().await;

        let trimmed = new_title.trim();
        if !trimmed.is_empty() {
            conversation.title = trimmed.to_string();
        }

        Ok(ConversationSummary::of(&conversation))
    }

    /// Summaries of all conversations, newest first.
    pub async fn list(&self) -> Vec<ConversationSummary> {
        let conversations = self.conversations.read().await;

        let mut summaries = Vec::with_capacity(conversations.len());
        for handle in conversations.values() {
            summaries.push(ConversationSummary::of(&*handle.read().await));
        }

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries
    }

    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}
