//! OpenAI-compatible chat completion backend.
//!
//! This crate provides [`OpenAiBrain`], a [`ChatModel`] that talks to any
//! endpoint implementing the `/v1/chat/completions` API.
//!
//! # Features
//!
//! - Uses `gpt-4o-mini` by default
//! - JSON-object mode for structured analysis prompts
//! - Per-call temperature override
//! - Configurable via environment variables
//!
//! # Usage
//!
//! ```rust,no_run
//! use openai_brain::{ChatMessage, ChatModel, CompletionOptions, OpenAiBrain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = OpenAiBrain::from_env()?;
//!     let reply = brain
//!         .complete(vec![ChatMessage::user("Hola")], CompletionOptions::default())
//!         .await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::OpenAiBrain;
pub use config::{OpenAiBrainConfig, OpenAiBrainConfigBuilder};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, BrainError, ChatMessage, ChatModel, ChatRole, CompletionOptions};
