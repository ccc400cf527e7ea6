//! Chat flow.
//!
//! `Received -> UserTurnPersisted -> HistoryLoaded -> ReplyGenerated ->
//! AssistantTurnPersisted`. The user turn is stored before the model is
//! called, so a model failure leaves it in place.

use brain_core::{
    assemble_prompt, build_user_context, normalize_history, BrainError, ChatMessage,
    CompletionOptions, StoredTurn, EMPTY_TEXT_PLACEHOLDER,
};
use database::validation::{validate_length, MAX_CONTENT_LENGTH};
use database::{chat_message, user, ChatAnnotation, ChatMessageRecord, ValidationError};
use sentiment::analyze_chat_message;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::OrchestratorError;
use crate::orchestrator::Orchestrator;

/// Default number of rows for raw message listings.
pub const DEFAULT_MESSAGE_LIMIT: i64 = 50;

/// Largest number of rows for raw message listings.
pub const MAX_MESSAGE_LIMIT: i64 = 200;

/// Result of one chat exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatExchange {
    /// The assistant's reply text.
    pub reply: String,
    /// The stored user turn. `None` when the user text was blank.
    pub user_message: Option<ChatMessageRecord>,
    /// The stored assistant turn.
    pub assistant_message: ChatMessageRecord,
}

fn annotate(text: &str) -> ChatAnnotation {
    let analysis = analyze_chat_message(text);
    ChatAnnotation {
        emotion: analysis.emotion.map(str::to_string),
        category: analysis.category.map(|c| c.label().to_string()),
        sentiment: Some(analysis.sentiment),
        summary: Some(analysis.summary),
    }
}

fn to_stored_turns(records: &[ChatMessageRecord]) -> Vec<StoredTurn> {
    records
        .iter()
        .map(|record| StoredTurn::new(record.role.as_str(), record.text.as_str()))
        .collect()
}

impl Orchestrator {
    /// Answer a user message as the companion persona.
    ///
    /// The prompt carries the persona, a context block with the user's
    /// display name and a retrieved snippet, the user's full prior history
    /// and the new text.
    pub async fn invoke_chat(
        &self,
        user_id: &str,
        text: &str,
    ) -> Result<ChatExchange, OrchestratorError> {
        validate_length("texto", text, MAX_CONTENT_LENGTH)?;
        let pool = self.db.pool();

        // Blank turns are never stored; the model still gets a placeholder.
        let (user_message, prior) = if text.trim().is_empty() {
            (None, chat_message::list_all(pool, user_id).await?)
        } else {
            let stored =
                chat_message::insert_message(pool, user_id, "user", text, &annotate(text)).await?;
            let prior = chat_message::history_before(pool, user_id, stored.id).await?;
            (Some(stored), prior)
        };

        let history = normalize_history(&to_stored_turns(&prior));
        let display_name = user::display_name(pool, user_id).await?;
        let query = if text.trim().is_empty() {
            EMPTY_TEXT_PLACEHOLDER
        } else {
            text
        };
        let snippet = self.retriever.retrieve(query).await;
        debug!(
            user_id,
            history_len = history.len(),
            has_context = snippet.is_some(),
            "Assembling chat prompt"
        );

        let user_context = build_user_context(&display_name, snippet.as_deref());
        let messages = assemble_prompt(&self.persona, &user_context, history, text);

        let reply = self
            .model
            .complete(messages, CompletionOptions::default())
            .await
            .map_err(|e| {
                error!(user_id, model = self.model.name(), error = %e, "Chat model failed");
                e
            })?;
        if reply.trim().is_empty() {
            warn!(user_id, model = self.model.name(), "Chat model returned a blank reply");
            return Err(BrainError::EmptyResponse.into());
        }

        let assistant_message =
            chat_message::insert_message(pool, user_id, "assistant", &reply, &annotate(&reply))
                .await?;

        info!(
            user_id,
            user_message_id = user_message.as_ref().map(|m| m.id),
            assistant_message_id = assistant_message.id,
            "Chat exchange stored"
        );

        Ok(ChatExchange {
            reply,
            user_message,
            assistant_message,
        })
    }

    /// The user's conversation as normalized role-tagged messages.
    pub async fn chat_history(&self, user_id: &str) -> Result<Vec<ChatMessage>, OrchestratorError> {
        let records = chat_message::list_all(self.db.pool(), user_id).await?;
        Ok(normalize_history(&to_stored_turns(&records)))
    }

    /// Raw stored turns, oldest first.
    ///
    /// Returns the most recent `limit` rows, optionally only those with an id
    /// below `before_id`.
    pub async fn list_chat_messages(
        &self,
        user_id: &str,
        limit: i64,
        before_id: Option<i64>,
    ) -> Result<Vec<ChatMessageRecord>, OrchestratorError> {
        if !(1..=MAX_MESSAGE_LIMIT).contains(&limit) {
            return Err(ValidationError::OutOfRange {
                field: "limit".to_string(),
                min: 1,
                max: MAX_MESSAGE_LIMIT,
                actual: limit,
            }
            .into());
        }

        Ok(chat_message::list_recent(self.db.pool(), user_id, limit, before_id).await?)
    }
}
