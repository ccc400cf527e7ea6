//! Banner and health check endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Banner {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct Health {
    pub status: String,
    pub uptime_sec: f64,
}

/// Root banner.
pub async fn banner() -> Json<Banner> {
    Json(Banner {
        message: "MiDiarioIA API - refer to /api/v1/health for status",
    })
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let uptime = state.started_at.elapsed().as_secs_f64();
    Json(Health {
        status: "ok".to_string(),
        uptime_sec: (uptime * 100.0).round() / 100.0,
    })
}
