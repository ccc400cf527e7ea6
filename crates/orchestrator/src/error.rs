//! Error types for orchestrator operations.

use brain_core::BrainError;
use database::{DatabaseError, ValidationError};
use thiserror::Error;

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Caller input was rejected before touching the store.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Record store failure, including not-found and conflicts.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Language model failure.
    #[error("model error: {0}")]
    Brain(#[from] BrainError),

    /// Model output could not be turned into an analysis.
    #[error("invalid analysis: {0}")]
    InvalidAnalysis(String),
}
