//! Database models.
//!
//! Field names are English in Rust; the serialized names match the JSON the
//! REST layer exposes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A user profile, keyed by the identity provider's subject id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    /// Subject id from the verified token.
    pub id: String,
    /// Display name, if the user set one.
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    /// Email from the identity provider.
    pub email: Option<String>,
    /// Creation timestamp.
    #[serde(rename = "creado_en")]
    pub created_at: String,
}

/// A diary entry with its optional derived analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DiaryEntry {
    pub id: i64,
    #[serde(rename = "usuario_id")]
    pub user_id: String,
    /// Calendar date of the entry (`YYYY-MM-DD`).
    #[serde(rename = "fecha")]
    pub entry_date: String,
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "contenido")]
    pub content: String,
    #[serde(rename = "resumen_ia")]
    pub summary: Option<String>,
    #[serde(rename = "emocion_predominante")]
    pub predominant_emotion: Option<String>,
    #[serde(rename = "categoria_emocional")]
    pub emotion_category: Option<String>,
    #[serde(rename = "promedio_sentimiento")]
    pub sentiment: Option<f64>,
    #[serde(rename = "fuente_modelo")]
    pub model_source: Option<String>,
    #[serde(rename = "creado_en")]
    pub created_at: String,
    #[serde(rename = "actualizado_en")]
    pub updated_at: String,
}

impl DiaryEntry {
    /// The derived analysis, if every derived field is present.
    pub fn enrichment(&self) -> Option<DiaryEnrichment> {
        Some(DiaryEnrichment {
            summary: self.summary.clone()?,
            predominant_emotion: self.predominant_emotion.clone()?,
            emotion_category: self.emotion_category.clone()?,
            sentiment: self.sentiment?,
            model_source: self.model_source.clone()?,
        })
    }
}

/// The complete set of derived fields for a diary entry.
///
/// This is the only way to write derived fields, so they are stored
/// all together or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct DiaryEnrichment {
    pub summary: String,
    pub predominant_emotion: String,
    pub emotion_category: String,
    pub sentiment: f64,
    pub model_source: String,
}

/// Input for a new diary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDiaryEntry {
    pub user_id: String,
    /// Defaults to today when `None`.
    pub entry_date: Option<String>,
    pub title: Option<String>,
    pub content: String,
}

/// Filters for listing a user's diary entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiaryFilter {
    /// Inclusive lower bound on `entry_date`.
    pub from_date: Option<String>,
    /// Inclusive upper bound on `entry_date`.
    pub to_date: Option<String>,
    /// Substring matched against title and content.
    pub query: Option<String>,
}

/// A stored chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ChatMessageRecord {
    pub id: i64,
    #[serde(rename = "usuario_id")]
    pub user_id: String,
    /// `"user"` or `"assistant"`.
    #[serde(rename = "rol")]
    pub role: String,
    #[serde(rename = "texto")]
    pub text: String,
    #[serde(rename = "emocion_detectada")]
    pub emotion: Option<String>,
    #[serde(rename = "categoria_emocional")]
    pub category: Option<String>,
    #[serde(rename = "puntuacion_sentimiento")]
    pub sentiment: Option<f64>,
    #[serde(rename = "resumen")]
    pub summary: Option<String>,
    #[serde(rename = "fecha")]
    pub created_at: String,
}

/// Lexicon annotations attached to a chat turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatAnnotation {
    pub emotion: Option<String>,
    pub category: Option<String>,
    pub sentiment: Option<f64>,
    pub summary: Option<String>,
}

/// Aggregated emotional metrics for one user and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EmotionMetric {
    pub id: i64,
    #[serde(rename = "usuario_id")]
    pub user_id: String,
    /// Period key, e.g. `2026-W42`.
    #[serde(rename = "periodo")]
    pub period: String,
    /// Emotion category to proportion.
    #[serde(rename = "emociones_predominantes")]
    pub emotions: Json<BTreeMap<String, f64>>,
    #[serde(rename = "promedio_sentimiento")]
    pub mean_sentiment: f64,
    #[serde(rename = "resumen_periodo")]
    pub summary: String,
    #[serde(rename = "recomendacion_general")]
    pub recommendation: String,
    #[serde(rename = "actualizado_en")]
    pub updated_at: String,
}

/// Input for upserting an emotion metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricUpsert {
    pub period: String,
    pub emotions: BTreeMap<String, f64>,
    pub mean_sentiment: f64,
    pub summary: String,
    pub recommendation: String,
}

/// A user's rating of an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: i64,
    #[serde(rename = "usuario_id")]
    pub user_id: String,
    #[serde(rename = "mensaje_id")]
    pub message_id: i64,
    /// Rating from 1 to 5.
    #[serde(rename = "puntuacion")]
    pub score: i64,
    #[serde(rename = "comentario")]
    pub comment: Option<String>,
    #[serde(rename = "creado_en")]
    pub created_at: String,
}

/// A published wellbeing recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Recommendation {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "fuente")]
    pub source: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "categoria")]
    pub category: Option<String>,
    #[serde(rename = "fecha_publicacion")]
    pub published_on: String,
}

/// A wellbeing challenge users can take on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Challenge {
    pub id: i64,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "icono")]
    pub icon: Option<String>,
    #[serde(rename = "dificultad")]
    pub difficulty: String,
    #[serde(rename = "fecha_creacion")]
    pub created_on: String,
}

/// A challenge assigned to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserChallenge {
    pub id: i64,
    #[serde(rename = "usuario_id")]
    pub user_id: String,
    #[serde(rename = "desafio_id")]
    pub challenge_id: i64,
    #[serde(rename = "completado")]
    pub completed: bool,
    #[serde(rename = "fecha_completado")]
    pub completed_at: Option<String>,
}

/// Aggregated progress for a user, computed from the other tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(rename = "usuario_id")]
    pub user_id: String,
    #[serde(rename = "total_reflexiones")]
    pub total_reflections: i64,
    #[serde(rename = "desafios_completados")]
    pub challenges_completed: i64,
    #[serde(rename = "interacciones_con_auri")]
    pub interactions_with_assistant: i64,
    #[serde(rename = "promedio_sentimiento")]
    pub mean_sentiment: Option<f64>,
    #[serde(rename = "recomendacion_actual")]
    pub current_recommendation: Option<String>,
}

/// A page of results plus the total count for the unpaged query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}
