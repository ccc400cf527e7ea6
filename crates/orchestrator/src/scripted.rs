//! Offline reply model used when no language model is configured.

use async_trait::async_trait;
use brain_core::{BrainError, ChatMessage, ChatModel, ChatRole, CompletionOptions};

/// Reply for clearly negative messages.
pub const SUPPORTIVE_REPLY: &str = "Siento que estés pasando por un momento difícil. Estoy aquí para escucharte y acompañarte. ¿Te gustaría que pensemos en una estrategia para sentirte un poco mejor?";

/// Reply for clearly positive messages.
pub const CELEBRATORY_REPLY: &str = "¡Me alegra mucho leer esto! Sigamos cultivando esos momentos positivos. ¿Hay algo que quieras celebrar o recordar de hoy?";

/// Reply for everything else.
pub const NEUTRAL_REPLY: &str = "Gracias por compartirlo conmigo. Cuéntame un poco más sobre cómo te sientes para que podamos encontrar el siguiente paso juntos.";

/// A model that picks one of three fixed replies from the lexicon sentiment
/// of the last user message.
///
/// Sentiment at or below -0.2 gets [`SUPPORTIVE_REPLY`], at or above 0.4 gets
/// [`CELEBRATORY_REPLY`], anything else [`NEUTRAL_REPLY`]. JSON-mode requests
/// are refused so structured callers fall back to their own defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedBrain;

impl ScriptedBrain {
    /// Create a new ScriptedBrain.
    pub fn new() -> Self {
        Self
    }

    /// The scripted reply for a piece of user text.
    pub fn reply_for(text: &str) -> &'static str {
        let sentiment = sentiment::score(text).sentiment;
        if sentiment <= -0.2 {
            SUPPORTIVE_REPLY
        } else if sentiment >= 0.4 {
            CELEBRATORY_REPLY
        } else {
            NEUTRAL_REPLY
        }
    }
}

#[async_trait]
impl ChatModel for ScriptedBrain {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<String, BrainError> {
        if options.json_mode {
            return Err(BrainError::ProcessingFailed(
                "scripted model has no structured output".to_string(),
            ));
        }

        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        Ok(Self::reply_for(last_user).to_string())
    }

    fn name(&self) -> &str {
        "ScriptedBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_thresholds() {
        assert_eq!(ScriptedBrain::reply_for("estoy triste"), SUPPORTIVE_REPLY);
        assert_eq!(ScriptedBrain::reply_for("estoy feliz"), CELEBRATORY_REPLY);
        assert_eq!(ScriptedBrain::reply_for("hoy fui al mercado"), NEUTRAL_REPLY);
    }

    #[tokio::test]
    async fn test_uses_last_user_message() {
        let brain = ScriptedBrain::new();
        let messages = vec![
            ChatMessage::system("persona"),
            ChatMessage::user("estoy feliz"),
            ChatMessage::assistant("¡Qué bien!"),
            ChatMessage::user("pero ahora estoy triste"),
        ];

        let reply = brain
            .complete(messages, CompletionOptions::default())
            .await
            .unwrap();
        assert_eq!(reply, SUPPORTIVE_REPLY);
    }

    #[tokio::test]
    async fn test_refuses_json_mode() {
        let result = ScriptedBrain
            .complete(vec![ChatMessage::user("hola")], CompletionOptions::json(0.5))
            .await;
        assert!(matches!(result, Err(BrainError::ProcessingFailed(_))));
    }
}
