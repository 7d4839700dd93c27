//! The single ongoing conversation.
//!
//! Backs the plain `/chat` endpoint: one process-wide conversation that
//! can be reset back to its seeded state at any time.

use std::sync::Arc;

use sagealpha_core::message::{Conversation, Message};
use tokio::sync::RwLock;

use crate::ConversationHandle;

const ONGOING_TITLE: &str = "Ongoing chat";

/// One process-wide conversation seeded with exactly one system message.
pub struct SingleConversation {
    seed: String,
    handle: ConversationHandle,
}

impl SingleConversation {
    /// Create the ongoing conversation, seeded with the given system
    /// greeting.
    pub fn new(seed: impl Into<String>) -> Self {
        let seed = seed.into();
        Self {
            handle: Arc::new(RwLock::new(Self::initial(&seed))),
            seed,
        }
    }

    fn initial(seed: &str) -> Conversation {
        let mut conversation = Conversation::new(ONGOING_TITLE);
        conversation.push(Message::system(seed));
        conversation
    }

    /// Handle to the live conversation.
    pub fn handle(&self) -> ConversationHandle {
        self.handle.clone()
    }

    /// Clear history, sections, and topic back to the seeded state.
    pub async fn reset(&self) {
        *self.handle.write().await = Self::initial(&self.seed);
    }
}
