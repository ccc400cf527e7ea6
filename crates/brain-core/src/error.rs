//! Error types for model operations.

use thiserror::Error;

/// Errors that can occur while talking to a language model backend.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The backend is misconfigured (missing key, bad URL, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request could not reach the backend.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with an error or an unusable payload.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The backend returned no content.
    #[error("empty response from model")]
    EmptyResponse,
}
