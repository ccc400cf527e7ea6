//! Lexicon scorer.

use indexmap::IndexMap;

use crate::lexicon::{lexicon, EmotionCategory, Polarity};

/// Characters stripped from both ends of every token.
const STRIP_CHARS: &[char] = &['.', ',', ';', ':', '!', '¿', '?', '¡'];

/// Result of scoring a piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Sentiment in `[-1.0, 1.0]`, rounded to two decimals.
    pub sentiment: f64,
    /// Most frequent emotion label, if any keyword matched.
    pub emotion: Option<&'static str>,
    /// Category of that emotion.
    pub category: Option<EmotionCategory>,
}

/// Split on whitespace, strip punctuation from token ends and lowercase.
///
/// Tokens that become empty after stripping are kept: they still count
/// towards the length normalization in [`score`].
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.trim_matches(STRIP_CHARS).to_lowercase())
        .collect()
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score `text` against the static lexicon.
///
/// Sentiment is `(positive - negative) / sqrt(token_count)`, rounded to two
/// decimals and clamped to `[-1.0, 1.0]`; the square root keeps short
/// exclamations from saturating. Empty input scores `0.0`.
///
/// The emotion is the most frequent `(emotion, category)` pair among matched
/// tokens; ties go to the pair seen first.
pub fn score(text: &str) -> Score {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return Score {
            sentiment: 0.0,
            emotion: None,
            category: None,
        };
    }

    let lex = lexicon();
    let mut positive = 0i64;
    let mut negative = 0i64;
    let mut counts: IndexMap<(&'static str, EmotionCategory), usize> = IndexMap::new();

    for token in &tokens {
        match lex.polarity(token) {
            Some(Polarity::Positive) => positive += 1,
            Some(Polarity::Negative) => negative += 1,
            _ => {}
        }
        if let Some(pair) = lex.emotion(token) {
            *counts.entry(pair).or_insert(0) += 1;
        }
    }

    let raw = (positive - negative) as f64 / (tokens.len() as f64).sqrt();
    let sentiment = round2(raw).clamp(-1.0, 1.0);

    let mut best: Option<((&'static str, EmotionCategory), usize)> = None;
    for (pair, count) in counts {
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((pair, count)),
        }
    }

    Score {
        sentiment,
        emotion: best.map(|((emotion, _), _)| emotion),
        category: best.map(|((_, category), _)| category),
    }
}
