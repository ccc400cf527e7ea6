//! User progress.

use axum::extract::State;
use axum::Json;
use database::Progress;

use crate::auth::AuthUser;
use crate::error::Result;
use crate::state::AppState;

/// Computed progress; zeros when the user has no data.
pub async fn progress(State(state): State<AppState>, user: AuthUser) -> Result<Json<Progress>> {
    Ok(Json(state.orchestrator.progress(&user.id).await?))
}
