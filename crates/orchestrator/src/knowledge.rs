//! Keyword retriever over a directory of JSON knowledge files.
//!
//! Each `*.json` file holds `{"entradas": [{"titulo": ..., "contenido": ...}]}`.
//! Every entry becomes one searchable document `"titulo: contenido"`.

use std::fs;
use std::io;
use std::path::Path;

use async_trait::async_trait;
use brain_core::KnowledgeRetriever;
use serde::Deserialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Maximum snippet length in characters.
pub const MAX_SNIPPET_CHARS: usize = 500;

/// Maximum size of a single knowledge file.
const MAX_FILE_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Deserialize)]
struct KbFile {
    #[serde(default)]
    entradas: Vec<KbFileEntry>,
}

#[derive(Debug, Deserialize)]
struct KbFileEntry {
    #[serde(default)]
    titulo: String,
    #[serde(default)]
    contenido: String,
}

#[derive(Debug, Clone)]
struct KbEntry {
    text: String,
    text_lower: String,
}

impl KbEntry {
    fn new(title: &str, content: &str) -> Option<Self> {
        let text = match (title.trim(), content.trim()) {
            ("", "") => return None,
            ("", content) => content.to_string(),
            (title, "") => title.to_string(),
            (title, content) => format!("{}: {}", title, content),
        };
        let text_lower = text.to_lowercase();
        Some(Self { text, text_lower })
    }
}

/// In-memory knowledge base loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KbEntry>,
}

impl KnowledgeBase {
    /// Load every `*.json` file under `path` (or the single file at `path`).
    ///
    /// Unreadable or malformed files are skipped with a warning.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();

        if path.is_file() {
            let entries = load_file(path)?;
            return Ok(Self { entries });
        }

        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Knowledge base path not found: {}", path.display()),
            ));
        }

        let mut entries = Vec::new();
        let mut files = 0usize;
        for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_map(Result::ok) {
            let file = entry.path();
            if !file.is_file() || !is_json(file) {
                continue;
            }
            match load_file(file) {
                Ok(loaded) => {
                    files += 1;
                    entries.extend(loaded);
                }
                Err(e) => warn!(path = %file.display(), error = %e, "Skipping knowledge file"),
            }
        }

        info!(
            path = %path.display(),
            files,
            entries = entries.len(),
            "Knowledge base loaded"
        );

        Ok(Self { entries })
    }

    /// Build a knowledge base from `(title, content)` pairs.
    pub fn from_entries<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .filter_map(|(title, content)| KbEntry::new(title, content))
                .collect(),
        }
    }

    /// Number of searchable entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the knowledge base has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry sharing the most query keywords.
    ///
    /// Ties go to the entry loaded first. The snippet is the entry text cut to
    /// [`MAX_SNIPPET_CHARS`] characters.
    pub fn search(&self, query: &str) -> Option<String> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return None;
        }

        let mut best: Option<(&KbEntry, usize)> = None;
        for entry in &self.entries {
            let score = tokens
                .iter()
                .map(|token| entry.text_lower.matches(token.as_str()).count())
                .sum::<usize>();

            if score > 0 {
                match best {
                    Some((_, best_score)) if best_score >= score => {}
                    _ => best = Some((entry, score)),
                }
            }
        }

        let (entry, score) = best?;
        debug!(score, "Knowledge base hit");
        Some(entry.text.chars().take(MAX_SNIPPET_CHARS).collect())
    }
}

#[async_trait]
impl KnowledgeRetriever for KnowledgeBase {
    async fn retrieve(&self, query: &str) -> Option<String> {
        self.search(query)
    }
}

fn load_file(path: &Path) -> io::Result<Vec<KbEntry>> {
    let metadata = fs::metadata(path)?;
    if metadata.len() == 0 || metadata.len() > MAX_FILE_BYTES {
        return Ok(Vec::new());
    }

    let text = fs::read_to_string(path)?;
    let file: KbFile = serde_json::from_str(&text)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    Ok(file
        .entradas
        .iter()
        .filter_map(|entry| KbEntry::new(&entry.titulo, &entry.contenido))
        .collect())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Lowercased words of more than three characters, at most eight.
fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() > 3)
        .take(8)
        .map(str::to_string)
        .collect()
}
