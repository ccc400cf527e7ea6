//! Diary, chat and metrics flows for MiDiarioIA.
//!
//! This crate provides the [`Orchestrator`] type, which coordinates the
//! record store, the diary analyzer, the knowledge retriever and the chat
//! model for every user-facing operation.
//!
//! # Flows
//!
//! ```text
//! Diary create:  Received → Persisted(raw) → Analyzed → Persisted(enriched)
//!                                   └── analysis/update failure → raw entry returned
//!
//! Chat invoke:   Received → UserTurnPersisted → HistoryLoaded
//!                         → ReplyGenerated → AssistantTurnPersisted
//!                                   └── model failure → error, user turn kept
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use database::Database;
//! use orchestrator::{CreateDiaryEntry, Orchestrator, ScriptedBrain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:midiario.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let orchestrator = Orchestrator::new(db, Arc::new(ScriptedBrain));
//!     let entry = orchestrator
//!         .create_diary_entry(
//!             "user-1",
//!             CreateDiaryEntry {
//!                 content: "Hoy me sentí feliz".to_string(),
//!                 ..Default::default()
//!             },
//!         )
//!         .await?;
//!     println!("{:?}", entry.predominant_emotion);
//!
//!     let exchange = orchestrator.invoke_chat("user-1", "Estoy cansado").await?;
//!     println!("{}", exchange.reply);
//!     Ok(())
//! }
//! ```

mod analyzer;
mod chat;
mod dashboard;
mod diary;
mod error;
mod json;
mod knowledge;
mod orchestrator;
mod persona;
mod scripted;
mod wellbeing;

#[cfg(test)]
mod testing;

// Public exports
pub use analyzer::{DiaryAnalyzer, HeuristicAnalyzer, LlmAnalyzer, DIARY_ANALYSIS_PROMPT};
pub use chat::{ChatExchange, DEFAULT_MESSAGE_LIMIT, MAX_MESSAGE_LIMIT};
pub use dashboard::{
    current_period, period_for, Dashboard, DASHBOARD_SUMMARY_PROMPT, FALLBACK_RECOMMENDATION,
    FALLBACK_SOURCE, FALLBACK_SUMMARY,
};
pub use diary::{
    validate_paging, CreateDiaryEntry, DiaryPage, DiaryPatch, DiaryQuery, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
pub use error::OrchestratorError;
pub use knowledge::{KnowledgeBase, MAX_SNIPPET_CHARS};
pub use orchestrator::Orchestrator;
pub use persona::{load_persona_prompt, load_prompt_file, DEFAULT_PERSONA_PROMPT_FILE};
pub use scripted::{ScriptedBrain, CELEBRATORY_REPLY, NEUTRAL_REPLY, SUPPORTIVE_REPLY};

// Re-export commonly used types from dependencies
pub use brain_core::{ChatMessage, ChatModel, ChatRole, KnowledgeRetriever};
