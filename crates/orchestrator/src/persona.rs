//! Persona prompt loading.

use std::env;
use std::path::Path;

use brain_core::DEFAULT_PERSONA_PROMPT;
use tracing::info;

/// Default path for the persona prompt file.
pub const DEFAULT_PERSONA_PROMPT_FILE: &str = "AURI_PROMPT.md";

/// Load the persona system prompt.
///
/// Priority:
/// 1. `AURI_SYSTEM_PROMPT` env var (if set and non-blank)
/// 2. Contents of prompt file (`AURI_PROMPT_FILE` or default `AURI_PROMPT.md`)
/// 3. Embedded default prompt
pub fn load_persona_prompt() -> String {
    if let Some(prompt) = env::var("AURI_SYSTEM_PROMPT")
        .ok()
        .filter(|p| !p.trim().is_empty())
    {
        info!("Using persona prompt from AURI_SYSTEM_PROMPT env var");
        return prompt;
    }

    let prompt_file =
        env::var("AURI_PROMPT_FILE").unwrap_or_else(|_| DEFAULT_PERSONA_PROMPT_FILE.to_string());

    if let Some(prompt) = load_prompt_file(&prompt_file) {
        info!("Loaded persona prompt from {}", prompt_file);
        return prompt;
    }

    info!("Using embedded default persona prompt");
    DEFAULT_PERSONA_PROMPT.to_string()
}

/// Load a prompt from a file path.
///
/// Returns `Some(content)` if the file exists, is readable and not blank.
pub fn load_prompt_file(path: impl AsRef<Path>) -> Option<String> {
    let content = std::fs::read_to_string(path.as_ref()).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
