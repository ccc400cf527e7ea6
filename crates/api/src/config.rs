//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;
use brain_core::BrainError;
use openai_brain::OpenAiBrainConfig;

const DEFAULT_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_DATABASE_URL: &str = "sqlite:midiario.db?mode=rwc";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:4321";
const DEFAULT_KB_PATH: &str = "kb";

/// Which analyzer enriches diary entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerKind {
    /// Lexicon scorer, no network.
    Heuristic,
    /// Chat model in JSON mode.
    Llm,
}

impl AnalyzerKind {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "" | "heuristic" => Ok(AnalyzerKind::Heuristic),
            "llm" => Ok(AnalyzerKind::Llm),
            other => Err(ConfigError::InvalidAnalyzer(other.to_string())),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Base URL of the Supabase project.
    pub supabase_url: String,
    /// Public anon key sent with token lookups.
    pub supabase_anon_key: String,
    /// Origins allowed by CORS.
    pub cors_origins: Vec<HeaderValue>,
    /// Diary analyzer selection.
    pub diary_analyzer: AnalyzerKind,
    /// Directory with knowledge base JSON files.
    pub kb_path: PathBuf,
    /// OpenAI settings; `None` when no API key is configured.
    pub openai: Option<OpenAiBrainConfig>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `MIDIARIO_ADDR` | Server bind address | `127.0.0.1:8000` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:midiario.db?mode=rwc` |
    /// | `SUPABASE_URL` | Supabase project URL | (required) |
    /// | `SUPABASE_ANON_KEY` | Supabase anon key | (required) |
    /// | `CORS_ORIGINS` | Comma-separated origins | `http://localhost:3000,http://localhost:4321` |
    /// | `DIARY_ANALYZER` | `heuristic` or `llm` | `heuristic` |
    /// | `KB_PATH` | Knowledge base directory | `kb` |
    /// | `OPENAI_API_KEY` | Enables the OpenAI model | (optional) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("MIDIARIO_ADDR")
            .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let supabase_url = required("SUPABASE_URL")?;
        let supabase_anon_key = required("SUPABASE_ANON_KEY")?;

        let cors_origins = parse_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
        )?;

        let diary_analyzer = match env::var("DIARY_ANALYZER") {
            Ok(value) => AnalyzerKind::parse(&value)?,
            Err(_) => AnalyzerKind::Heuristic,
        };

        let kb_path = PathBuf::from(env::var("KB_PATH").unwrap_or_else(|_| DEFAULT_KB_PATH.to_string()));

        let openai = match env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Some(OpenAiBrainConfig::from_env()?),
            _ => None,
        };

        Ok(Self {
            addr,
            database_url,
            supabase_url,
            supabase_anon_key,
            cors_origins,
            diary_analyzer,
            kb_path,
            openai,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_origins(value: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))
        })
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid MIDIARIO_ADDR format")]
    InvalidAddr,

    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("Invalid CORS origin: {0}")]
    InvalidOrigin(String),

    #[error("Invalid DIARY_ANALYZER value: {0} (expected heuristic or llm)")]
    InvalidAnalyzer(String),

    #[error("OpenAI configuration: {0}")]
    OpenAi(#[from] BrainError),
}
