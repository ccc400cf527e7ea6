//! Test doubles for the model and retriever seams.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use brain_core::{BrainError, ChatMessage, ChatModel, CompletionOptions, KnowledgeRetriever};
use database::Database;

use crate::orchestrator::Orchestrator;

/// Persona used by orchestrator tests.
pub(crate) const TEST_PERSONA: &str = "Eres Auri.";

/// An orchestrator over a fresh in-memory database.
pub(crate) async fn test_orchestrator(model: Arc<dyn ChatModel>) -> Orchestrator {
    let db = Database::connect_with_pool_size("sqlite::memory:", 1)
        .await
        .unwrap();
    db.migrate().await.unwrap();
    Orchestrator::new(db, model).with_persona(TEST_PERSONA)
}

/// A model that returns a fixed reply (or fails) and records every call.
pub(crate) struct FixedModel {
    reply: Option<String>,
    calls: Mutex<Vec<(Vec<ChatMessage>, CompletionOptions)>>,
}

impl FixedModel {
    pub(crate) fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<(Vec<ChatMessage>, CompletionOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for FixedModel {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<String, BrainError> {
        self.calls.lock().unwrap().push((messages, options));
        self.reply
            .clone()
            .ok_or_else(|| BrainError::Network("connection refused".to_string()))
    }

    fn name(&self) -> &str {
        "FixedModel"
    }
}

/// A retriever that always returns the same snippet.
pub(crate) struct FixedRetriever(pub(crate) &'static str);

#[async_trait]
impl KnowledgeRetriever for FixedRetriever {
    async fn retrieve(&self, _query: &str) -> Option<String> {
        Some(self.0.to_string())
    }
}

/// A retriever that remembers every query and returns a fixed snippet.
pub(crate) struct RecordingRetriever {
    snippet: &'static str,
    queries: Mutex<Vec<String>>,
}

impl RecordingRetriever {
    pub(crate) fn new(snippet: &'static str) -> Self {
        Self {
            snippet,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl KnowledgeRetriever for RecordingRetriever {
    async fn retrieve(&self, query: &str) -> Option<String> {
        self.queries.lock().unwrap().push(query.to_string());
        Some(self.snippet.to_string())
    }
}
