//! Message, Section, and Conversation domain types.
//!
//! These are the core value objects that flow through the system:
//! a user sends a message → the chat engine builds a prompt → the
//! generation provider answers → the exchange is recorded as one
//! user/assistant message pair plus one Q&A section.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (persona, memory, retrieval context)
    System,
    /// The end user
    User,
    /// The assistant's answer
    Assistant,
}

/// A single message in a conversation.
///
/// Immutable once appended; append order is chronological and
/// semantically meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,

    /// Optional metadata (channel info, provider info, etc.)
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// One recorded question/answer exchange.
///
/// Sections are the unit the session memory builder works from.
/// Never mutated after being appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// When the exchange happened (ISO 8601)
    pub timestamp: String,

    /// The user's question
    pub query: String,

    /// The assistant's answer
    pub answer: String,
}

impl Section {
    /// Create a section stamped with the current UTC time.
    pub fn now(query: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            query: query.into(),
            answer: answer.into(),
        }
    }
}

/// A conversation: ordered messages, Q&A sections, and the current topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: ConversationId,

    /// Human-readable title
    pub title: String,

    /// When this conversation was created
    pub created_at: DateTime<Utc>,

    /// Ordered messages
    pub messages: Vec<Message>,

    /// Ordered Q&A sections, one per completed turn
    pub sections: Vec<Section>,

    /// The inferred current subject; empty when nothing has been established
    #[serde(default)]
    pub current_topic: String,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ConversationId::new(),
            title: title.into(),
            created_at: Utc::now(),
            messages: Vec::new(),
            sections: Vec::new(),
            current_topic: String::new(),
        }
    }

    /// Add a message to the conversation.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Record one completed turn: user message, assistant answer, and the
    /// matching section, appended together so the two records stay in
    /// lockstep. Returns the appended assistant message.
    pub fn record_turn(
        &mut self,
        user_message: impl Into<String>,
        assistant_answer: impl Into<String>,
    ) -> Message {
        let query = user_message.into();
        let answer = assistant_answer.into();

        self.messages.push(Message::user(query.clone()));
        let assistant = Message::assistant(answer.clone());
        self.messages.push(assistant.clone());
        self.sections.push(Section::now(query, answer));

        assistant
    }

    /// How many completed turns this conversation holds.
    pub fn turn_count(&self) -> usize {
        self.sections.len()
    }
}
