//! The ChatModel trait definition.

use async_trait::async_trait;

use crate::error::BrainError;
use crate::message::ChatMessage;

/// Per-call knobs for a completion request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionOptions {
    /// Ask the backend for a JSON object response.
    pub json_mode: bool,
    /// Override the backend's default temperature.
    pub temperature: Option<f32>,
}

impl CompletionOptions {
    /// Options for a JSON-object completion at the given temperature.
    pub fn json(temperature: f32) -> Self {
        Self {
            json_mode: true,
            temperature: Some(temperature),
        }
    }
}

/// A language model that turns an ordered message list into text.
///
/// This trait is object-safe and can be used with `Arc<dyn ChatModel>`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a reply for the given conversation.
    ///
    /// # Returns
    ///
    /// The generated text, or an error if the backend failed. No retries are
    /// performed.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<String, BrainError>;

    /// Get a human-readable name for this backend.
    fn name(&self) -> &str;
}
