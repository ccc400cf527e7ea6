//! Current user profile.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use database::UserProfile;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProfilePatch {
    pub nombre: Option<String>,
}

/// Profile of the caller, created on first access.
pub async fn me(State(state): State<AppState>, user: AuthUser) -> Result<Json<UserProfile>> {
    let profile = state
        .orchestrator
        .profile(&user.id, user.email.as_deref())
        .await?;
    Ok(Json(profile))
}

/// Update the caller's display name.
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<ProfilePatch>, JsonRejection>,
) -> Result<Json<UserProfile>> {
    let Json(patch) = payload?;
    let profile = match patch.nombre {
        Some(name) => {
            state
                .orchestrator
                .update_profile_name(&user.id, &name, user.email.as_deref())
                .await?
        }
        None => state.orchestrator.profile(&user.id, user.email.as_deref()).await?,
    };
    Ok(Json(profile))
}
