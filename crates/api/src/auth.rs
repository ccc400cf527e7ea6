//! Bearer token authentication against the Supabase identity service.
//!
//! Handlers take [`AuthUser`] when a caller must be signed in and
//! [`MaybeAuthUser`] on public routes. Both reject a present but malformed
//! or invalid `Authorization` header.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Autenticación requerida.")]
    Missing,

    #[error("Cabecera Authorization inválida.")]
    Malformed,

    #[error("Token inválido o expirado.")]
    InvalidToken,

    /// The identity provider could not be reached or answered unexpectedly.
    #[error("identity provider error: {0}")]
    Provider(String),
}

/// A verified caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    /// Subject id issued by the identity provider.
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Turns a bearer token into a caller identity.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError>;
}

/// Verifies tokens with the Supabase `/auth/v1/user` endpoint.
pub struct SupabaseVerifier {
    client: reqwest::Client,
    user_url: String,
    anon_key: String,
}

impl SupabaseVerifier {
    pub fn new(base_url: &str, anon_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            user_url: format!("{}/auth/v1/user", base_url.trim_end_matches('/')),
            anon_key: anon_key.into(),
        }
    }
}

#[async_trait]
impl TokenVerifier for SupabaseVerifier {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .client
            .get(&self.user_url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!(%status, "Token rejected by identity provider");
            return Err(AuthError::InvalidToken);
        }
        if !status.is_success() {
            warn!(%status, "Unexpected identity provider response");
            return Err(AuthError::Provider(format!("unexpected status {}", status)));
        }

        let user: AuthUser = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        if user.id.trim().is_empty() {
            return Err(AuthError::InvalidToken);
        }
        Ok(user)
    }
}

/// Extract the bearer token, if an `Authorization` header is present.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| AuthError::Malformed)?;
    let (scheme, token) = value.split_once(' ').ok_or(AuthError::Malformed)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::Malformed);
    }

    Ok(Some(token))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?.ok_or(AuthError::Missing)?;
        Ok(state.verifier.verify(token).await?)
    }
}

/// A caller that may be anonymous.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match bearer_token(&parts.headers)? {
            Some(token) => Ok(MaybeAuthUser(Some(state.verifier.verify(token).await?))),
            None => Ok(MaybeAuthUser(None)),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Accepts `token-<id>` and nothing else.
    pub(crate) struct StaticVerifier;

    #[async_trait]
    impl TokenVerifier for StaticVerifier {
        async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
            match token.strip_prefix("token-") {
                Some(id) if !id.is_empty() => Ok(AuthUser {
                    id: id.to_string(),
                    email: Some(format!("{}@example.com", id)),
                }),
                _ => Err(AuthError::InvalidToken),
            }
        }
    }
}
