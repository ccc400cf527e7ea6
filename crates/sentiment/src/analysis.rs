//! Heuristic enrichment of diary entries and chat messages.

use serde::{Deserialize, Serialize};

use crate::lexicon::EmotionCategory;
use crate::scorer::score;
use crate::summary::summarize;

/// Model source tag written by the heuristic analyzer.
pub const HEURISTIC_SOURCE: &str = "heuristic-v1";

/// Emotion label used when no keyword matched.
pub const NEUTRAL_EMOTION: &str = "neutral";

const DIARY_SUMMARY_CHARS: usize = 200;
const CHAT_SUMMARY_CHARS: usize = 160;

/// Derived fields attached to a diary entry.
///
/// All fields are always present together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryAnalysis {
    pub summary: String,
    pub emotion: String,
    pub category: EmotionCategory,
    pub sentiment: f64,
    pub model_source: String,
}

/// Annotations attached to a single chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatAnalysis {
    pub sentiment: f64,
    pub emotion: Option<&'static str>,
    pub category: Option<EmotionCategory>,
    pub summary: String,
}

/// Analyze a diary entry with the lexicon.
///
/// Text with no emotional keyword is labelled [`NEUTRAL_EMOTION`] /
/// [`EmotionCategory::Neutral`].
pub fn analyze_diary_entry(text: &str) -> DiaryAnalysis {
    let s = score(text);
    DiaryAnalysis {
        summary: summarize(text, DIARY_SUMMARY_CHARS),
        emotion: s.emotion.unwrap_or(NEUTRAL_EMOTION).to_string(),
        category: s.category.unwrap_or(EmotionCategory::Neutral),
        sentiment: s.sentiment,
        model_source: HEURISTIC_SOURCE.to_string(),
    }
}

/// Analyze a chat message with the lexicon.
pub fn analyze_chat_message(text: &str) -> ChatAnalysis {
    let s = score(text);
    ChatAnalysis {
        sentiment: s.sentiment,
        emotion: s.emotion,
        category: s.category,
        summary: summarize(text, CHAT_SUMMARY_CHARS),
    }
}
