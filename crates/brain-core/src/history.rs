//! Conversation history normalization.
//!
//! Stored chat turns carry a free-form role string and whatever text was
//! persisted. Before they reach a model they are filtered and mapped onto
//! [`ChatRole`] so the prompt never contains blank or repeated turns.

use tracing::warn;

use crate::message::{ChatMessage, ChatRole};

/// A chat turn as it comes out of the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTurn {
    /// Raw role value ("user", "assistant", or legacy values).
    pub role: String,
    /// Turn text.
    pub text: String,
}

impl StoredTurn {
    /// Create a stored turn.
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            text: text.into(),
        }
    }
}

/// Convert stored turns into model-ready messages.
///
/// - Turns with empty or whitespace-only text are dropped.
/// - A turn whose text is byte-identical to the previous *kept* turn is dropped.
/// - Role `"user"` maps to [`ChatRole::User`]; every other value maps to
///   [`ChatRole::Assistant`]. Values other than `"assistant"` are logged.
///
/// Input order is preserved.
pub fn normalize_history(turns: &[StoredTurn]) -> Vec<ChatMessage> {
    let mut messages: Vec<ChatMessage> = Vec::with_capacity(turns.len());

    for turn in turns {
        if turn.text.trim().is_empty() {
            continue;
        }

        if messages.last().is_some_and(|last| last.content == turn.text) {
            continue;
        }

        let role = match turn.role.trim() {
            "user" => ChatRole::User,
            "assistant" => ChatRole::Assistant,
            other => {
                warn!(role = other, "Unexpected chat role in history, treating as assistant");
                ChatRole::Assistant
            }
        };

        messages.push(ChatMessage {
            role,
            content: turn.text.clone(),
        });
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_turns(messages: &[ChatMessage]) -> Vec<StoredTurn> {
        messages
            .iter()
            .map(|m| StoredTurn::new(m.role.as_str(), m.content.clone()))
            .collect()
    }

    #[test]
    fn test_drops_duplicates_and_empty() {
        let turns = vec![
            StoredTurn::new("user", "hola"),
            StoredTurn::new("user", "hola"),
            StoredTurn::new("assistant", ""),
        ];

        let messages = normalize_history(&turns);
        assert_eq!(messages, vec![ChatMessage::user("hola")]);
    }

    #[test]
    fn test_whitespace_only_dropped() {
        let turns = vec![
            StoredTurn::new("user", "   \n\t"),
            StoredTurn::new("assistant", "¿Cómo estás?"),
        ];

        let messages = normalize_history(&turns);
        assert_eq!(messages, vec![ChatMessage::assistant("¿Cómo estás?")]);
    }

    #[test]
    fn test_only_consecutive_duplicates_removed() {
        let turns = vec![
            StoredTurn::new("user", "hola"),
            StoredTurn::new("assistant", "¡Hola!"),
            StoredTurn::new("user", "hola"),
        ];

        let messages = normalize_history(&turns);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2], ChatMessage::user("hola"));
    }

    #[test]
    fn test_duplicate_compared_against_kept_turn() {
        // The blank turn in the middle is dropped, so the third turn
        // follows the first kept turn and is suppressed.
        let turns = vec![
            StoredTurn::new("user", "estoy cansado"),
            StoredTurn::new("assistant", " "),
            StoredTurn::new("assistant", "estoy cansado"),
        ];

        let messages = normalize_history(&turns);
        assert_eq!(messages, vec![ChatMessage::user("estoy cansado")]);
    }

    #[test]
    fn test_duplicate_check_is_byte_exact() {
        let turns = vec![
            StoredTurn::new("user", "Hola"),
            StoredTurn::new("user", "hola"),
            StoredTurn::new("user", "hola "),
        ];

        assert_eq!(normalize_history(&turns).len(), 3);
    }

    #[test]
    fn test_unknown_roles_map_to_assistant() {
        let turns = vec![
            StoredTurn::new(" user ", "uno"),
            StoredTurn::new("bot", "dos"),
            StoredTurn::new("", "tres"),
        ];

        let messages = normalize_history(&turns);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[2].role, ChatRole::Assistant);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let turns = vec![
            StoredTurn::new("user", "me siento solo"),
            StoredTurn::new("user", "me siento solo"),
            StoredTurn::new("assistant", "Aquí estoy"),
            StoredTurn::new("user", ""),
            StoredTurn::new("user", "gracias"),
        ];

        let once = normalize_history(&turns);
        let twice = normalize_history(&as_turns(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_history() {
        assert!(normalize_history(&[]).is_empty());
    }
}
