//! Lexicon-based sentiment and emotion scoring.
//!
//! Everything in this crate is a pure function over static keyword tables:
//!
//! - [`score`] - bounded sentiment plus best-guess emotion/category
//! - [`summarize`] - whitespace-collapsing, length-capped summary
//! - [`analyze_diary_entry`] / [`analyze_chat_message`] - heuristic enrichment
//! - [`dashboard_metrics`] / [`period_metrics`] - aggregation over annotated records
//!
//! # Example
//!
//! ```rust
//! let score = sentiment::score("feliz feliz triste");
//! assert_eq!(score.sentiment, 0.58);
//! assert_eq!(score.emotion, Some("alegría"));
//! ```

mod analysis;
mod lexicon;
mod metrics;
mod scorer;
mod summary;

pub use analysis::{
    analyze_chat_message, analyze_diary_entry, ChatAnalysis, DiaryAnalysis, HEURISTIC_SOURCE,
    NEUTRAL_EMOTION,
};
pub use lexicon::{lexicon, EmotionCategory, Lexicon, Polarity};
pub use metrics::{
    dashboard_metrics, period_metrics, DashboardMetrics, EmotionSample, PeriodMetrics,
    DEFAULT_RECOMMENDATION,
};
pub use scorer::{round2, score, tokenize, Score};
pub use summary::summarize;
