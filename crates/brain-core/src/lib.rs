//! Core traits and types for language model backends.
//!
//! This crate provides the shared interface between the MiDiarioIA
//! orchestrator and whatever produces assistant replies. It defines:
//!
//! - [`ChatModel`] - The trait that all model backends must implement
//! - [`ChatMessage`] / [`ChatRole`] - Role-tagged messages sent to a model
//! - [`normalize_history`] - Stored chat turns to model-ready messages
//! - [`assemble_prompt`] - Persona, user context, history and new utterance
//! - [`KnowledgeRetriever`] - Trait for best-effort context retrieval
//! - [`BrainError`] - Error types for model operations
//!
//! # Example
//!
//! ```rust
//! use brain_core::{async_trait, BrainError, ChatMessage, ChatModel, CompletionOptions};
//!
//! struct EchoModel;
//!
//! #[async_trait]
//! impl ChatModel for EchoModel {
//!     async fn complete(
//!         &self,
//!         messages: Vec<ChatMessage>,
//!         _options: CompletionOptions,
//!     ) -> Result<String, BrainError> {
//!         Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "EchoModel"
//!     }
//! }
//! ```

mod error;
mod history;
mod message;
mod prompt;
mod retriever;
mod trait_def;

pub use error::BrainError;
pub use history::{normalize_history, StoredTurn};
pub use message::{ChatMessage, ChatRole};
pub use prompt::{
    assemble_prompt, build_user_context, hash_prompt, DEFAULT_PERSONA_PROMPT, EMPTY_TEXT_PLACEHOLDER,
    NO_CONTEXT_SENTENCE,
};
pub use retriever::{KnowledgeRetriever, NoContextRetriever};
pub use trait_def::{ChatModel, CompletionOptions};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
