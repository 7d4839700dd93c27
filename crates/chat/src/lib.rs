//! # SageAlpha Chat Core
//!
//! Topic-aware session memory and hybrid retrieval-augmented answer
//! construction. One turn flows through five stages:
//!
//! 1. [`topic::update_topic`] — does this message change the subject?
//! 2. [`memory::build_memory`] — compact memory from prior Q&A sections
//! 3. external search → [`retrieval::select_context`] — relevance gate
//! 4. [`prompt::build_messages`] — fixed-order message assembly
//! 5. external generation → the exchange is recorded in the store
//!
//! The topic and relevance logic is intentionally heuristic string
//! matching, not a classifier; false positives are an accepted part of
//! the design.

pub mod engine;
pub mod markdown;
pub mod memory;
pub mod prompt;
pub mod retrieval;
pub mod topic;

pub use engine::{ChatEngine, QueryOutcome, TurnOptions, TurnOutcome};
pub use markdown::strip_markdown;
pub use memory::build_memory;
pub use prompt::build_messages;
pub use retrieval::select_context;
pub use topic::update_topic;

/// The seed greeting for the single ongoing conversation.
pub const SEED_GREETING: &str = "I'm SageAlpha, a financial assistant powered by SageAlpha.ai to support your financial decisions.";

#[cfg(test)]
pub(crate) mod test_helpers;
