//! Wellbeing recommendations and challenges.
//!
//! Listings are public; creating content and tracking challenges needs a
//! signed-in caller.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use database::{Challenge, NewChallenge, NewRecommendation, Recommendation, UserChallenge};
use orchestrator::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use tracing::debug;

use super::{Items, PageResponse};
use crate::auth::{AuthUser, MaybeAuthUser};
use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    pub categoria: Option<String>,
    pub q: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ChallengeParams {
    pub dificultad: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UserChallengeParams {
    pub completado: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecommendationBody {
    pub titulo: String,
    pub fuente: Option<String>,
    pub url: Option<String>,
    pub categoria: Option<String>,
    pub fecha_publicacion: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateChallengeBody {
    pub descripcion: String,
    pub icono: Option<String>,
    pub dificultad: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignBody {
    pub desafio_id: i64,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn list_recommendations(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    params: std::result::Result<Query<RecommendationParams>, QueryRejection>,
) -> Result<Json<PageResponse<Recommendation>>> {
    let Query(params) = params?;
    debug!(signed_in = user.is_some(), "Listing recommendations");

    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let category = non_blank(params.categoria);
    let query = non_blank(params.q);

    let found = state
        .orchestrator
        .list_recommendations(category.as_deref(), query.as_deref(), page, page_size)
        .await?;
    Ok(Json(PageResponse::new(found, page, page_size)))
}

pub async fn create_recommendation(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: std::result::Result<Json<CreateRecommendationBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Recommendation>)> {
    let Json(body) = payload?;
    let created = state
        .orchestrator
        .create_recommendation(NewRecommendation {
            title: body.titulo,
            source: body.fuente,
            url: body.url,
            category: body.categoria,
            published_on: body.fecha_publicacion,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_challenges(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    params: std::result::Result<Query<ChallengeParams>, QueryRejection>,
) -> Result<Json<PageResponse<Challenge>>> {
    let Query(params) = params?;
    debug!(signed_in = user.is_some(), "Listing challenges");

    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let difficulty = non_blank(params.dificultad);

    let found = state
        .orchestrator
        .list_challenges(difficulty.as_deref(), page, page_size)
        .await?;
    Ok(Json(PageResponse::new(found, page, page_size)))
}

pub async fn create_challenge(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: std::result::Result<Json<CreateChallengeBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Challenge>)> {
    let Json(body) = payload?;
    let created = state
        .orchestrator
        .create_challenge(NewChallenge {
            description: body.descripcion,
            icon: body.icono,
            difficulty: body.dificultad,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_user_challenges(
    State(state): State<AppState>,
    user: AuthUser,
    params: std::result::Result<Query<UserChallengeParams>, QueryRejection>,
) -> Result<Json<Items<UserChallenge>>> {
    let Query(params) = params?;
    let items = state
        .orchestrator
        .list_user_challenges(&user.id, params.completado)
        .await?;
    Ok(Json(Items { items }))
}

/// Assign a challenge to the caller.
pub async fn assign_challenge(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<AssignBody>, JsonRejection>,
) -> Result<(StatusCode, Json<UserChallenge>)> {
    let Json(body) = payload?;
    let assignment = state
        .orchestrator
        .assign_challenge(&user.id, body.desafio_id)
        .await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

pub async fn complete_challenge(
    State(state): State<AppState>,
    user: AuthUser,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<UserChallenge>> {
    let Path(id) = id?;
    Ok(Json(state.orchestrator.complete_challenge(&user.id, id).await?))
}
