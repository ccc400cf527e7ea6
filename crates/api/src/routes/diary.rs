//! Diary entry endpoints. Every route is scoped to the caller.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use database::{DiaryEntry, DiaryFilter};
use orchestrator::{CreateDiaryEntry, DiaryPage, DiaryPatch, DiaryQuery, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
    pub fecha: Option<String>,
    pub titulo: Option<String>,
    pub contenido: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
    pub titulo: Option<String>,
    pub contenido: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<DiaryPage>> {
    let Query(params) = params?;
    let query = DiaryQuery {
        page: params.page.unwrap_or(1),
        page_size: params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        filter: DiaryFilter {
            from_date: params.from_date,
            to_date: params.to_date,
            query: params.q.filter(|q| !q.trim().is_empty()),
        },
    };
    Ok(Json(state.orchestrator.list_diary_entries(&user.id, query).await?))
}

/// Create an entry. Analysis is best-effort; the raw entry is returned if it fails.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<CreateBody>, JsonRejection>,
) -> Result<(StatusCode, Json<DiaryEntry>)> {
    let Json(body) = payload?;
    let entry = state
        .orchestrator
        .create_diary_entry(
            &user.id,
            CreateDiaryEntry {
                entry_date: body.fecha,
                title: body.titulo,
                content: body.contenido,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<DiaryEntry>> {
    let Path(id) = id?;
    Ok(Json(state.orchestrator.get_diary_entry(&user.id, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<UpdateBody>, JsonRejection>,
) -> Result<Json<DiaryEntry>> {
    let Path(id) = id?;
    let Json(body) = payload?;
    let patch = DiaryPatch {
        title: body.titulo,
        content: body.contenido,
    };
    Ok(Json(state.orchestrator.update_diary_entry(&user.id, id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Deleted>> {
    let Path(id) = id?;
    state.orchestrator.delete_diary_entry(&user.id, id).await?;
    Ok(Json(Deleted { deleted: true }))
}
