//! Dashboard aggregates and per-period emotion metrics.

use brain_core::{ChatMessage, CompletionOptions};
use chrono::{NaiveDate, Utc};
use database::validation::{validate_length, validate_period, validate_required, MAX_CONTENT_LENGTH};
use database::{chat_message, diary, metric, EmotionMetric, MetricUpsert, ValidationError};
use sentiment::{dashboard_metrics, period_metrics, DashboardMetrics, EmotionSample};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::OrchestratorError;
use crate::json::extract_json;
use crate::orchestrator::Orchestrator;

/// Summary shown when no model summary is available.
pub const FALLBACK_SUMMARY: &str = "Aquí verás tu resumen emocional cuando escribas en tu diario.";

/// Recommendation shown when no model summary is available.
pub const FALLBACK_RECOMMENDATION: &str = "Intenta escribir cómo te sientes hoy para empezar.";

/// Model source tag for the fallback texts.
pub const FALLBACK_SOURCE: &str = "fallback";

/// Temperature used for dashboard summaries.
const SUMMARY_TEMPERATURE: f32 = 0.7;

/// System prompt for the dashboard summarizer.
pub const DASHBOARD_SUMMARY_PROMPT: &str = r#"Eres "Auri", una asistente especializada en bienestar emocional.
Vas a recibir un JSON con el resumen emocional de una persona. Devuelve un análisis cálido y empático.
No hables de "métricas" ni de "datos"; habla de sus emociones y sentimientos.

Responde únicamente con un objeto JSON con estas claves:
"resumen_ia": un resumen cálido de 2-3 frases,
"recomendacion_ia": un consejo breve de 1-2 frases."#;

/// Dashboard payload: aggregate numbers plus a short narrative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    #[serde(flatten)]
    pub metrics: DashboardMetrics,
    #[serde(rename = "resumen_ia")]
    pub summary: String,
    #[serde(rename = "recomendacion_ia")]
    pub recommendation: String,
    #[serde(rename = "fuente_modelo")]
    pub model_source: String,
}

#[derive(Debug, Deserialize)]
struct SummaryReply {
    resumen_ia: String,
    recomendacion_ia: String,
}

/// Period key for a date: year and Sunday-based week number, e.g. `2026-W42`.
pub fn period_for(date: NaiveDate) -> String {
    date.format("%Y-W%U").to_string()
}

/// Period key for today (UTC).
pub fn current_period() -> String {
    period_for(Utc::now().date_naive())
}

impl Orchestrator {
    /// Samples from enriched diary entries and annotated user chat turns.
    async fn emotion_samples(&self, user_id: &str) -> Result<Vec<EmotionSample>, OrchestratorError> {
        let pool = self.db.pool();
        let entries = diary::list_enriched_entries(pool, user_id).await?;
        let turns = chat_message::list_annotated_user_turns(pool, user_id).await?;

        let samples = entries
            .into_iter()
            .map(|entry| EmotionSample {
                emotion: entry.predominant_emotion,
                category: entry.emotion_category,
                sentiment: entry.sentiment,
            })
            .chain(turns.into_iter().map(|turn| EmotionSample {
                emotion: turn.emotion,
                category: turn.category,
                sentiment: turn.sentiment,
            }))
            .collect();

        Ok(samples)
    }

    /// Aggregate the user's emotional data for the dashboard.
    ///
    /// The narrative comes from the summarizer model when one is configured
    /// and the user has data; otherwise, or on any summarizer failure, the
    /// fixed fallback texts are used.
    pub async fn dashboard(&self, user_id: &str) -> Result<Dashboard, OrchestratorError> {
        let total = diary::count_entries(self.db.pool(), user_id).await?;
        let samples = self.emotion_samples(user_id).await?;
        let has_data = !samples.is_empty();
        let metrics = dashboard_metrics(total, samples);

        if has_data {
            if let Some((summary, recommendation, source)) = self.summarize(user_id, &metrics).await {
                return Ok(Dashboard {
                    metrics,
                    summary,
                    recommendation,
                    model_source: source,
                });
            }
        }

        Ok(Dashboard {
            metrics,
            summary: FALLBACK_SUMMARY.to_string(),
            recommendation: FALLBACK_RECOMMENDATION.to_string(),
            model_source: FALLBACK_SOURCE.to_string(),
        })
    }

    async fn summarize(
        &self,
        user_id: &str,
        metrics: &DashboardMetrics,
    ) -> Option<(String, String, String)> {
        let model = self.summarizer.as_ref()?;

        let payload = match serde_json::to_string(metrics) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(user_id, error = %e, "Could not serialize dashboard metrics");
                return None;
            }
        };

        let messages = vec![
            ChatMessage::system(DASHBOARD_SUMMARY_PROMPT),
            ChatMessage::user(payload),
        ];

        let reply = match model
            .complete(messages, CompletionOptions::json(SUMMARY_TEMPERATURE))
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(user_id, model = model.name(), error = %e, "Dashboard summary failed");
                return None;
            }
        };
        debug!(user_id, reply = %reply, "Dashboard summary reply");

        match serde_json::from_str::<SummaryReply>(extract_json(&reply)) {
            Ok(parsed)
                if !parsed.resumen_ia.trim().is_empty()
                    && !parsed.recomendacion_ia.trim().is_empty() =>
            {
                Some((
                    parsed.resumen_ia.trim().to_string(),
                    parsed.recomendacion_ia.trim().to_string(),
                    model.name().to_string(),
                ))
            }
            Ok(_) => {
                warn!(user_id, "Dashboard summary was blank");
                None
            }
            Err(e) => {
                warn!(user_id, error = %e, "Dashboard summary was not valid JSON");
                None
            }
        }
    }

    /// Recompute and store the metric for the period containing `today`.
    ///
    /// Uses every annotated user chat turn and enriched diary entry. Returns
    /// `None` (and stores nothing) when no record carries a category.
    pub async fn generate_period_metrics(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Option<EmotionMetric>, OrchestratorError> {
        let samples = self.emotion_samples(user_id).await?;
        let Some(computed) = period_metrics(samples) else {
            info!(user_id, "No emotional data for period metrics");
            return Ok(None);
        };

        let upsert = MetricUpsert {
            period: period_for(today),
            emotions: computed.proportions,
            mean_sentiment: computed.mean_sentiment,
            summary: computed.summary,
            recommendation: computed.recommendation,
        };
        let stored = metric::upsert_metric(self.db.pool(), user_id, &upsert).await?;
        info!(user_id, period = %stored.period, dominant = %computed.dominant, "Period metrics generated");

        Ok(Some(stored))
    }

    /// Look up the stored metric for a period.
    pub async fn period_metric(
        &self,
        user_id: &str,
        period: &str,
    ) -> Result<EmotionMetric, OrchestratorError> {
        validate_period(period)?;
        Ok(metric::get_metric(self.db.pool(), user_id, period).await?)
    }

    /// Store a metric supplied by the caller.
    ///
    /// The mean sentiment is clamped to `[-1, 1]`.
    pub async fn upsert_period_metric(
        &self,
        user_id: &str,
        mut upsert: MetricUpsert,
    ) -> Result<EmotionMetric, OrchestratorError> {
        validate_period(&upsert.period)?;
        validate_required("resumen_periodo", &upsert.summary, MAX_CONTENT_LENGTH)?;
        validate_length("recomendacion_general", &upsert.recommendation, MAX_CONTENT_LENGTH)?;
        if !upsert.mean_sentiment.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "promedio_sentimiento".to_string(),
                expected: "a number between -1 and 1",
            }
            .into());
        }

        upsert.mean_sentiment = upsert.mean_sentiment.clamp(-1.0, 1.0);
        Ok(metric::upsert_metric(self.db.pool(), user_id, &upsert).await?)
    }
}
