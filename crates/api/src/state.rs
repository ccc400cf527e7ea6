//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Instant;

use orchestrator::Orchestrator;

use crate::auth::TokenVerifier;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Diary, chat and metrics flows.
    pub orchestrator: Orchestrator,
    /// Bearer token verification.
    pub verifier: Arc<dyn TokenVerifier>,
    /// Server start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Create new application state.
    pub fn new(orchestrator: Orchestrator, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            orchestrator,
            verifier,
            started_at: Instant::now(),
        }
    }
}
