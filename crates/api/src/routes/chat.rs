//! Chat endpoints: the companion exchange, raw turns, history and feedback.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use database::{ChatMessageRecord, Feedback};
use orchestrator::{ChatExchange, ChatMessage, DEFAULT_MESSAGE_LIMIT};
use serde::{Deserialize, Serialize};

use super::Items;
use crate::auth::AuthUser;
use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub texto: String,
}

#[derive(Debug, Serialize)]
pub struct InvokeResponse {
    pub respuesta: String,
    pub mensaje_usuario_id: Option<i64>,
    pub mensaje_asistente_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct MessageParams {
    pub limit: Option<i64>,
    pub before_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackBody {
    pub mensaje_id: i64,
    pub puntuacion: i64,
    pub comentario: Option<String>,
}

/// Send a message to the companion and get its reply.
pub async fn invoke(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<InvokeResponse>> {
    let Json(body) = payload?;
    let exchange = state.orchestrator.invoke_chat(&user.id, &body.texto).await?;
    Ok(Json(InvokeResponse {
        respuesta: exchange.reply,
        mensaje_usuario_id: exchange.user_message.map(|m| m.id),
        mensaje_asistente_id: exchange.assistant_message.id,
    }))
}

/// Same flow as [`invoke`], returning both stored rows.
pub async fn create_message(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<ChatExchange>> {
    let Json(body) = payload?;
    Ok(Json(state.orchestrator.invoke_chat(&user.id, &body.texto).await?))
}

pub async fn list_messages(
    State(state): State<AppState>,
    user: AuthUser,
    params: std::result::Result<Query<MessageParams>, QueryRejection>,
) -> Result<Json<Items<ChatMessageRecord>>> {
    let Query(params) = params?;
    let items = state
        .orchestrator
        .list_chat_messages(
            &user.id,
            params.limit.unwrap_or(DEFAULT_MESSAGE_LIMIT),
            params.before_id,
        )
        .await?;
    Ok(Json(Items { items }))
}

pub async fn history(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Items<ChatMessage>>> {
    let items = state.orchestrator.chat_history(&user.id).await?;
    Ok(Json(Items { items }))
}

/// Rate one of the caller's messages.
pub async fn feedback(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<FeedbackBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Feedback>)> {
    let Json(body) = payload?;
    let created = state
        .orchestrator
        .submit_feedback(
            &user.id,
            body.mensaje_id,
            body.puntuacion,
            body.comentario.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_feedback(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Items<Feedback>>> {
    let items = state.orchestrator.list_feedback(&user.id).await?;
    Ok(Json(Items { items }))
}
