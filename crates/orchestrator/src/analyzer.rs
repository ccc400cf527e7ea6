//! Diary analyzers: lexicon heuristic or language model.

use std::sync::Arc;

use async_trait::async_trait;
use brain_core::{ChatMessage, ChatModel, CompletionOptions};
use serde::Deserialize;
use sentiment::{analyze_diary_entry, summarize, DiaryAnalysis, EmotionCategory};
use tracing::debug;

use crate::error::OrchestratorError;
use crate::json::extract_json;

/// Temperature used for diary analysis completions.
const ANALYSIS_TEMPERATURE: f32 = 0.5;

/// System prompt for JSON-mode diary analysis.
pub const DIARY_ANALYSIS_PROMPT: &str = r#"Eres "Auri", una asistente especializada en bienestar emocional.
Tu tarea es analizar una entrada de diario de un usuario y extraer:

1. "resumen_ia": un resumen corto (2-3 frases) de lo que el usuario escribió.
2. "emocion_predominante": la emoción principal que detectas (por ejemplo "tristeza", "alegría", "ansiedad", "gratitud", "enojo").
3. "categoria_emocional": "positiva", "negativa" o "neutra".
4. "promedio_sentimiento": un número de -1.0 (muy negativo) a 1.0 (muy positivo).

Responde únicamente con un objeto JSON con exactamente esas cuatro claves."#;

/// Produces the derived fields of a diary entry.
#[async_trait]
pub trait DiaryAnalyzer: Send + Sync {
    /// Analyze the entry content.
    async fn analyze(&self, text: &str) -> Result<DiaryAnalysis, OrchestratorError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Analyzer backed by the static lexicon. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnalyzer;

#[async_trait]
impl DiaryAnalyzer for HeuristicAnalyzer {
    async fn analyze(&self, text: &str) -> Result<DiaryAnalysis, OrchestratorError> {
        Ok(analyze_diary_entry(text))
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

/// Analyzer that asks a language model for a JSON analysis.
pub struct LlmAnalyzer {
    model: Arc<dyn ChatModel>,
    source: String,
}

#[derive(Debug, Deserialize)]
struct LlmDiaryAnalysis {
    resumen_ia: String,
    emocion_predominante: String,
    categoria_emocional: String,
    promedio_sentimiento: f64,
}

impl LlmAnalyzer {
    /// Create an analyzer that tags results with `source` (usually the model name).
    pub fn new(model: Arc<dyn ChatModel>, source: impl Into<String>) -> Self {
        Self {
            model,
            source: source.into(),
        }
    }

    /// Parse the model's reply into an analysis.
    ///
    /// Sentiment is clamped to `[-1, 1]`, the category is normalized to one of
    /// the three labels and the summary is capped at 200 characters.
    pub fn parse(&self, reply: &str) -> Result<DiaryAnalysis, OrchestratorError> {
        let raw: LlmDiaryAnalysis = serde_json::from_str(extract_json(reply)).map_err(|e| {
            OrchestratorError::InvalidAnalysis(format!("parse error: {}, response was: {}", e, reply))
        })?;

        let emotion = raw.emocion_predominante.trim().to_lowercase();
        if emotion.is_empty() {
            return Err(OrchestratorError::InvalidAnalysis(
                "empty emotion label".to_string(),
            ));
        }
        if !raw.promedio_sentimiento.is_finite() {
            return Err(OrchestratorError::InvalidAnalysis(
                "sentiment is not a number".to_string(),
            ));
        }

        Ok(DiaryAnalysis {
            summary: summarize(&raw.resumen_ia, 200),
            emotion,
            category: EmotionCategory::parse_lenient(&raw.categoria_emocional),
            sentiment: raw.promedio_sentimiento.clamp(-1.0, 1.0),
            model_source: self.source.clone(),
        })
    }
}

#[async_trait]
impl DiaryAnalyzer for LlmAnalyzer {
    async fn analyze(&self, text: &str) -> Result<DiaryAnalysis, OrchestratorError> {
        let messages = vec![
            ChatMessage::system(DIARY_ANALYSIS_PROMPT),
            ChatMessage::user(text),
        ];

        let reply = self
            .model
            .complete(messages, CompletionOptions::json(ANALYSIS_TEMPERATURE))
            .await?;

        debug!(model = self.model.name(), reply = %reply, "Diary analysis reply");

        self.parse(&reply)
    }

    fn name(&self) -> &str {
        "llm"
    }
}
