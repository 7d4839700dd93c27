//! The turn engine — orchestrates one chat turn end to end.
//!
//! Topic update → session memory → retrieval → relevance gate → prompt
//! assembly → generation → record. Conversation locks are held only for
//! the brief topic/record steps, never across a provider call.
//!
//! Retrieval failure degrades to an empty document list; generation
//! failure is fatal to the single request and surfaces to the caller.

use std::sync::Arc;

use sagealpha_core::document::Citation;
use sagealpha_core::error::ChatError;
use sagealpha_core::message::Message;
use sagealpha_core::provider::{GenerationOptions, GenerationProvider, SearchProvider};
use sagealpha_store::ConversationHandle;
use tracing::{info, warn};

use crate::markdown::strip_markdown;
use crate::memory::build_memory;
use crate::prompt::build_messages;
use crate::retrieval::select_context_with_cap;
use crate::topic::update_topic;

/// Per-turn tunables, normally sourced from configuration.
#[derive(Debug, Clone)]
pub struct TurnOptions {
    /// How many documents to request from the search provider
    pub top_k: usize,
    /// Minimum score for a document to enter the context
    pub relevance_threshold: f32,
    /// How many prior Q&A sections feed the session memory
    pub memory_limit: usize,
    /// Character cap on the rendered session memory
    pub memory_max_chars: usize,
    /// Character cap on the rendered retrieval context
    pub context_max_chars: usize,
    /// Generation call tunables
    pub generation: GenerationOptions,
}

impl Default for TurnOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            relevance_threshold: 0.35,
            memory_limit: 5,
            memory_max_chars: 1500,
            context_max_chars: 6000,
            generation: GenerationOptions::default(),
        }
    }
}

/// Result of one completed conversational turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The assistant message appended by this turn. Taken from the
    /// recording step itself, so it stays this turn's message even when
    /// other requests append to the same conversation concurrently.
    pub message: Message,
    /// The generated answer
    pub answer: String,
    /// One citation per retrieved document (gated or not), in rank order
    pub citations: Vec<Citation>,
}

/// Result of a one-shot query (no conversation state involved).
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub answer: String,
    pub citations: Vec<Citation>,
}

/// Orchestrates chat turns against injected providers.
pub struct ChatEngine {
    search: Arc<dyn SearchProvider>,
    generation: Arc<dyn GenerationProvider>,
    options: TurnOptions,
}

impl ChatEngine {
    pub fn new(search: Arc<dyn SearchProvider>, generation: Arc<dyn GenerationProvider>) -> Self {
        Self {
            search,
            generation,
            options: TurnOptions::default(),
        }
    }

    /// Override the default tunables.
    pub fn with_options(mut self, options: TurnOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &TurnOptions {
        &self.options
    }

    /// Run one turn against a conversation.
    ///
    /// `top_k` overrides the configured document count for this turn
    /// only (callers may pass it per request).
    pub async fn run_turn(
        &self,
        conversation: &ConversationHandle,
        user_message: &str,
        top_k: Option<usize>,
    ) -> Result<TurnOutcome, ChatError> {
        let user_message = user_message.trim();
        if user_message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        // Brief lock: update the topic and snapshot the sections.
        let (topic, sections) = {
            let mut guard = conversation.write().await;
            let topic = update_topic(user_message, &guard.current_topic);
            guard.current_topic = topic.clone();
            (topic, guard.sections.clone())
        };

        let memory = build_memory(
            &sections,
            &topic,
            self.options.memory_limit,
            self.options.memory_max_chars,
        );

        let retrieved = self.retrieve(user_message, top_k).await;
        let context = select_context_with_cap(
            &retrieved,
            self.options.relevance_threshold,
            self.options.context_max_chars,
        );

        info!(
            topic = %topic,
            docs = retrieved.len(),
            context_len = context.len(),
            memory_len = memory.len(),
            "Running chat turn"
        );

        let messages = build_messages(
            user_message,
            &context,
            (!memory.is_empty()).then_some(memory.as_str()),
        );

        let answer = self
            .generation
            .complete(&messages, &self.options.generation)
            .await
            .map_err(ChatError::Generation)?;

        // Brief lock: append both messages and the section together.
        let message = {
            let mut guard = conversation.write().await;
            guard.record_turn(user_message, &answer)
        };

        Ok(TurnOutcome {
            message,
            answer,
            citations: retrieved.iter().map(Citation::from).collect(),
        })
    }

    /// One-shot query: retrieval-augmented answer with no conversation
    /// state and a markdown cleanup pass on the output.
    pub async fn one_shot(
        &self,
        query: &str,
        top_k: Option<usize>,
    ) -> Result<QueryOutcome, ChatError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let retrieved = self.retrieve(query, top_k).await;
        let context = select_context_with_cap(
            &retrieved,
            self.options.relevance_threshold,
            self.options.context_max_chars,
        );

        let messages = build_messages(query, &context, None);

        let answer = self
            .generation
            .complete(&messages, &self.options.generation)
            .await
            .map_err(ChatError::Generation)?;

        Ok(QueryOutcome {
            answer: strip_markdown(&answer),
            citations: retrieved.iter().map(Citation::from).collect(),
        })
    }

    /// Search, degrading any provider failure to an empty result set.
    async fn retrieve(
        &self,
        query: &str,
        top_k: Option<usize>,
    ) -> Vec<sagealpha_core::document::RetrievedDocument> {
        let top_k = top_k.unwrap_or(self.options.top_k);
        match self.search.search(query, top_k).await {
            Ok(docs) => docs,
            Err(e) => {
                warn!(provider = %self.search.name(), error = %e, "Search failed, continuing without context");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use sagealpha_core::message::{Conversation, Role};
    use tokio::sync::RwLock;

    fn conversation() -> ConversationHandle {
        Arc::new(RwLock::new(Conversation::new("test")))
    }

    #[tokio::test]
    async fn empty_message_rejected_before_any_call() {
        let search = Arc::new(FakeSearchProvider::with_docs(vec![]));
        let generation = Arc::new(FakeGenerationProvider::answering("unused"));
        let engine = ChatEngine::new(search.clone(), generation.clone());

        let result = engine.run_turn(&conversation(), "   ", None).await;
        assert!(matches!(result, Err(ChatError::EmptyMessage)));
        assert_eq!(search.calls(), 0);
        assert_eq!(generation.calls(), 0);
    }

    #[tokio::test]
    async fn turn_records_messages_and_section() {
        let engine = ChatEngine::new(
            Arc::new(FakeSearchProvider::with_docs(vec![scored_doc("d1", "Cupid text", 0.9)])),
            Arc::new(FakeGenerationProvider::answering("It makes products.")),
        );
        let conversation = conversation();

        let outcome = engine
            .run_turn(&conversation, "Cupid Limited", None)
            .await
            .unwrap();

        assert_eq!(outcome.answer, "It makes products.");
        assert!(!outcome.message.id.is_empty());
        assert_eq!(outcome.citations.len(), 1);
        assert_eq!(outcome.citations[0].doc_id, "d1");

        let guard = conversation.read().await;
        assert_eq!(guard.messages.len(), 2);
        assert_eq!(guard.sections.len(), 1);
        assert_eq!(guard.current_topic, "cupid limited");
    }

    #[tokio::test]
    async fn outcome_message_is_this_turns_record() {
        let engine = ChatEngine::new(
            Arc::new(FakeSearchProvider::with_docs(vec![])),
            Arc::new(FakeGenerationProvider::with_answers(vec![
                "First answer.".into(),
                "Second answer.".into(),
            ])),
        );
        let conversation = conversation();

        let first = engine
            .run_turn(&conversation, "Cupid Limited", None)
            .await
            .unwrap();
        let second = engine
            .run_turn(&conversation, "who is the owner", None)
            .await
            .unwrap();

        // Each outcome describes its own assistant message, not the
        // latest one in the conversation.
        assert_eq!(first.message.content, "First answer.");
        assert_eq!(second.message.content, "Second answer.");
        assert_ne!(first.message.id, second.message.id);

        let guard = conversation.read().await;
        assert_eq!(guard.messages[1].id, first.message.id);
        assert_eq!(guard.messages[3].id, second.message.id);
    }

    #[tokio::test]
    async fn search_failure_degrades_to_empty_context() {
        let generation = Arc::new(FakeGenerationProvider::answering("From model knowledge."));
        let engine = ChatEngine::new(Arc::new(FailingSearchProvider), generation.clone());
        let conversation = conversation();

        let outcome = engine
            .run_turn(&conversation, "Cupid Limited", None)
            .await
            .unwrap();

        assert_eq!(outcome.answer, "From model knowledge.");
        assert!(outcome.citations.is_empty());

        let prompts = generation.seen_prompts();
        let context = prompts[0]
            .iter()
            .find(|m| m.content.starts_with("Context:"))
            .unwrap();
        assert_eq!(context.content, "Context:\n");
    }

    #[tokio::test]
    async fn generation_failure_leaves_conversation_unrecorded() {
        let engine = ChatEngine::new(
            Arc::new(FakeSearchProvider::with_docs(vec![])),
            Arc::new(FailingGenerationProvider),
        );
        let conversation = conversation();

        let result = engine.run_turn(&conversation, "Cupid Limited", None).await;
        assert!(matches!(result, Err(ChatError::Generation(_))));

        let guard = conversation.read().await;
        assert!(guard.messages.is_empty());
        assert!(guard.sections.is_empty());
        // Topic was still updated, matching the recorded-before-failure
        // behavior of the original flow.
        assert_eq!(guard.current_topic, "cupid limited");
    }

    #[tokio::test]
    async fn citations_cover_sub_threshold_documents() {
        let engine = ChatEngine::new(
            Arc::new(FakeSearchProvider::with_docs(vec![
                scored_doc("kept", "relevant", 0.9),
                scored_doc("dropped", "irrelevant", 0.1),
            ])),
            Arc::new(FakeGenerationProvider::answering("ok")),
        );

        let outcome = engine
            .run_turn(&conversation(), "Cupid Limited", None)
            .await
            .unwrap();

        // The UI shows every retrieved source, gated or not.
        assert_eq!(outcome.citations.len(), 2);
    }

    #[tokio::test]
    async fn per_request_top_k_reaches_the_provider() {
        let search = Arc::new(FakeSearchProvider::with_docs(vec![]));
        let engine = ChatEngine::new(
            search.clone(),
            Arc::new(FakeGenerationProvider::answering("ok")),
        );

        engine
            .run_turn(&conversation(), "Cupid Limited", Some(3))
            .await
            .unwrap();

        assert_eq!(search.last_top_k(), Some(3));
    }

    #[tokio::test]
    async fn one_shot_strips_markdown_and_skips_memory() {
        let generation = Arc::new(FakeGenerationProvider::answering("**Bold** answer"));
        let engine = ChatEngine::new(
            Arc::new(FakeSearchProvider::with_docs(vec![])),
            generation.clone(),
        );

        let outcome = engine.one_shot("who owns cupid", None).await.unwrap();
        assert_eq!(outcome.answer, "Bold answer");

        let prompts = generation.seen_prompts();
        assert!(
            !prompts[0]
                .iter()
                .any(|m| m.content.starts_with("Session memory")),
        );
    }

    #[tokio::test]
    async fn second_turn_prompt_carries_topic_matched_memory() {
        // End-to-end scenario: "Cupid Limited" then "who is the owner".
        let generation = Arc::new(FakeGenerationProvider::with_answers(vec![
            "Cupid Limited is a manufacturer.".into(),
            "The promoter is X.".into(),
        ]));
        let engine = ChatEngine::new(
            Arc::new(FakeSearchProvider::with_docs(vec![])),
            generation.clone(),
        );
        let conversation = conversation();

        engine
            .run_turn(&conversation, "Cupid Limited", None)
            .await
            .unwrap();
        engine
            .run_turn(&conversation, "who is the owner", None)
            .await
            .unwrap();

        // Topic survives the question-style follow-up.
        assert_eq!(conversation.read().await.current_topic, "cupid limited");

        let prompts = generation.seen_prompts();
        // First turn has no memory yet.
        assert!(
            !prompts[0]
                .iter()
                .any(|m| m.content.starts_with("Session memory"))
        );
        // Second turn carries the first exchange as session memory.
        let memory = prompts[1]
            .iter()
            .find(|m| m.content.starts_with("Session memory"))
            .expect("second turn must include session memory");
        assert!(memory.content.contains("Q: Cupid Limited"));
        assert!(memory.content.contains("Cupid Limited is a manufacturer."));
        assert_eq!(memory.role, Role::System);
    }
}
