//! MiDiarioIA REST API.
//!
//! Serves the diary, chat, metrics and wellbeing endpoints under `/api/v1`.
//! Callers authenticate with a Supabase bearer token.

mod auth;
mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::http::Method;
use brain_core::ChatModel;
use database::Database;
use openai_brain::OpenAiBrain;
use orchestrator::{KnowledgeBase, LlmAnalyzer, Orchestrator, ScriptedBrain};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::auth::SupabaseVerifier;
use crate::config::{AnalyzerKind, Config};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting MiDiarioIA API");

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let orchestrator = build_orchestrator(&config, db)?;
    let verifier = SupabaseVerifier::new(&config.supabase_url, config.supabase_anon_key.clone());
    let state = AppState::new(orchestrator, Arc::new(verifier));

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origins.clone())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    info!(addr = %config.addr, "MiDiarioIA API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wire the chat model, diary analyzer, dashboard summarizer and knowledge
/// base according to the configuration.
fn build_orchestrator(
    config: &Config,
    db: Database,
) -> Result<Orchestrator, Box<dyn std::error::Error>> {
    let openai: Option<Arc<dyn ChatModel>> = match &config.openai {
        Some(openai_config) => {
            info!(model = %openai_config.model, "Using OpenAI chat model");
            Some(Arc::new(OpenAiBrain::new(openai_config.clone())?))
        }
        None => {
            warn!("OPENAI_API_KEY not set, using scripted replies");
            None
        }
    };

    let model: Arc<dyn ChatModel> = match &openai {
        Some(model) => model.clone(),
        None => Arc::new(ScriptedBrain),
    };
    let mut orchestrator = Orchestrator::new(db, model);

    match (config.diary_analyzer, &openai, &config.openai) {
        (AnalyzerKind::Llm, Some(model), Some(openai_config)) => {
            info!("Diary entries analyzed by the language model");
            orchestrator = orchestrator.with_analyzer(Arc::new(LlmAnalyzer::new(
                model.clone(),
                openai_config.model.clone(),
            )));
        }
        (AnalyzerKind::Llm, _, _) => {
            warn!("DIARY_ANALYZER=llm needs OPENAI_API_KEY, using the heuristic analyzer");
        }
        (AnalyzerKind::Heuristic, _, _) => {}
    }

    if let Some(model) = openai {
        orchestrator = orchestrator.with_summarizer(model);
    }

    match KnowledgeBase::load(&config.kb_path) {
        Ok(kb) if !kb.is_empty() => {
            info!(entries = kb.len(), path = %config.kb_path.display(), "Loaded knowledge base");
            orchestrator = orchestrator.with_retriever(Arc::new(kb));
        }
        Ok(_) => {
            info!(path = %config.kb_path.display(), "Knowledge base is empty");
        }
        Err(err) => {
            warn!(error = %err, path = %config.kb_path.display(), "Failed to load knowledge base");
        }
    }

    Ok(orchestrator)
}
