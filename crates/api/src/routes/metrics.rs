//! Dashboard and per-period emotion metrics.

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use database::{EmotionMetric, MetricUpsert};
use orchestrator::Dashboard;
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PeriodParams {
    pub periodo: String,
}

#[derive(Debug, Deserialize)]
pub struct UpsertBody {
    pub periodo: String,
    #[serde(default)]
    pub emociones_predominantes: BTreeMap<String, f64>,
    #[serde(default)]
    pub promedio_sentimiento: f64,
    #[serde(default)]
    pub resumen_periodo: String,
    #[serde(default)]
    pub recomendacion_general: String,
}

pub async fn dashboard(State(state): State<AppState>, user: AuthUser) -> Result<Json<Dashboard>> {
    Ok(Json(state.orchestrator.dashboard(&user.id).await?))
}

pub async fn get_period(
    State(state): State<AppState>,
    user: AuthUser,
    params: std::result::Result<Query<PeriodParams>, QueryRejection>,
) -> Result<Json<EmotionMetric>> {
    let Query(params) = params?;
    Ok(Json(
        state
            .orchestrator
            .period_metric(&user.id, params.periodo.trim())
            .await?,
    ))
}

pub async fn upsert_period(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<UpsertBody>, JsonRejection>,
) -> Result<Json<EmotionMetric>> {
    let Json(body) = payload?;
    let upsert = MetricUpsert {
        period: body.periodo.trim().to_string(),
        emotions: body.emociones_predominantes,
        mean_sentiment: body.promedio_sentimiento,
        summary: body.resumen_periodo,
        recommendation: body.recomendacion_general,
    };
    Ok(Json(state.orchestrator.upsert_period_metric(&user.id, upsert).await?))
}

/// Recompute the metric for the current period.
pub async fn generate(State(state): State<AppState>, user: AuthUser) -> Result<Json<EmotionMetric>> {
    let today = Utc::now().date_naive();
    match state.orchestrator.generate_period_metrics(&user.id, today).await? {
        Some(metric) => Ok(Json(metric)),
        None => {
            info!(user_id = %user.id, "Nothing to aggregate for period metrics");
            Err(ApiError::NotFound(
                "No hay datos emocionales para calcular métricas.".to_string(),
            ))
        }
    }
}
