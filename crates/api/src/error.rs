//! Error types for the REST layer.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use orchestrator::OrchestratorError;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed or rejected credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Request body, query or path failed validation.
    #[error("{0}")]
    Validation(String),

    /// Record does not exist or belongs to another user.
    #[error("{0}")]
    NotFound(String),

    /// Record already exists.
    #[error("{0}")]
    Conflict(String),

    /// The identity provider or the language model failed.
    #[error("{0}")]
    ExternalService(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::ExternalService(_) => "external_service_error",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                "Error interno del servidor.".to_string()
            }
            ApiError::ExternalService(msg) => {
                error!("External service error: {}", msg);
                msg.clone()
            }
            other => other.to_string(),
        };

        let body = serde_json::json!({
            "error": {
                "code": self.code(),
                "message": message,
            }
        });

        (self.status(), Json(body)).into_response()
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::Validation(e) => ApiError::Validation(e.to_string()),
            OrchestratorError::Database(e @ DatabaseError::NotFound { .. }) => {
                ApiError::NotFound(e.to_string())
            }
            OrchestratorError::Database(e @ DatabaseError::AlreadyExists { .. }) => {
                ApiError::Conflict(e.to_string())
            }
            OrchestratorError::Database(e) => ApiError::Internal(e.to_string()),
            OrchestratorError::Brain(e) => ApiError::ExternalService(e.to_string()),
            OrchestratorError::InvalidAnalysis(msg) => ApiError::ExternalService(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Provider(msg) => ApiError::ExternalService(msg),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
