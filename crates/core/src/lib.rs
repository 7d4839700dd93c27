//! # SageAlpha Core
//!
//! Domain types, traits, and error definitions for the SageAlpha chat backend.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The external collaborators (ranked-document search, chat completion) are
//! defined as traits here. Implementations live in `sagealpha-providers`.
//! This enables:
//! - Swapping implementations via configuration
//! - Easy testing with deterministic fake providers
//! - Clean dependency graph (all crates depend inward on core)

pub mod document;
pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use document::{Citation, DocumentMeta, RetrievedDocument};
pub use error::{ChatError, ProviderError, StoreError};
pub use message::{Conversation, ConversationId, Message, Role, Section};
pub use provider::{GenerationOptions, GenerationProvider, SearchProvider};
