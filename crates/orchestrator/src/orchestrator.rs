//! The orchestrator: shared handles for every user-facing flow.

use std::sync::Arc;

use brain_core::{hash_prompt, ChatModel, KnowledgeRetriever, NoContextRetriever};
use database::Database;
use tracing::info;

use crate::analyzer::{DiaryAnalyzer, HeuristicAnalyzer};
use crate::persona::load_persona_prompt;

/// Coordinates the record store, the analyzers, the retriever and the model.
///
/// The flows themselves live in the `diary`, `chat` and `dashboard` modules.
/// Cloning is cheap; every collaborator is behind an `Arc` or a pool.
#[derive(Clone)]
pub struct Orchestrator {
    pub(crate) db: Database,
    pub(crate) model: Arc<dyn ChatModel>,
    pub(crate) analyzer: Arc<dyn DiaryAnalyzer>,
    pub(crate) retriever: Arc<dyn KnowledgeRetriever>,
    pub(crate) summarizer: Option<Arc<dyn ChatModel>>,
    pub(crate) persona: String,
}

impl Orchestrator {
    /// Create an orchestrator with the heuristic analyzer, no knowledge
    /// base, no dashboard summarizer and the persona from
    /// [`load_persona_prompt`].
    pub fn new(db: Database, model: Arc<dyn ChatModel>) -> Self {
        let persona = load_persona_prompt();
        info!("Persona prompt fingerprint: {}", hash_prompt(&persona));

        Self {
            db,
            model,
            analyzer: Arc::new(HeuristicAnalyzer),
            retriever: Arc::new(NoContextRetriever),
            summarizer: None,
            persona,
        }
    }

    /// Use a different diary analyzer.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn DiaryAnalyzer>) -> Self {
        info!(analyzer = analyzer.name(), "Diary analyzer configured");
        self.analyzer = analyzer;
        self
    }

    /// Use a knowledge retriever for chat context.
    pub fn with_retriever(mut self, retriever: Arc<dyn KnowledgeRetriever>) -> Self {
        self.retriever = retriever;
        self
    }

    /// Let a model write the dashboard summary and recommendation.
    pub fn with_summarizer(mut self, summarizer: Arc<dyn ChatModel>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Override the persona prompt.
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        info!("Persona prompt fingerprint: {}", hash_prompt(&self.persona));
        self
    }

    /// The record store.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// The chat model.
    pub fn model(&self) -> &dyn ChatModel {
        self.model.as_ref()
    }

    /// The persona prompt in use.
    pub fn persona(&self) -> &str {
        &self.persona
    }
}
