//! Static keyword tables.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Coarse emotional category of a label or record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionCategory {
    #[serde(rename = "positiva")]
    Positive,
    #[serde(rename = "negativa")]
    Negative,
    #[serde(rename = "neutra")]
    Neutral,
}

impl EmotionCategory {
    /// Label stored in the database and returned over the API.
    pub fn label(&self) -> &'static str {
        match self {
            EmotionCategory::Positive => "positiva",
            EmotionCategory::Negative => "negativa",
            EmotionCategory::Neutral => "neutra",
        }
    }

    /// Parse a category label leniently.
    ///
    /// Accepts Spanish and English spellings in any case; anything
    /// unrecognized is treated as neutral.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "positiva" | "positivo" | "positive" => EmotionCategory::Positive,
            "negativa" | "negativo" | "negative" => EmotionCategory::Negative,
            _ => EmotionCategory::Neutral,
        }
    }
}

impl fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sentiment polarity of a single keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

/// Keyword tables used by the scorer.
#[derive(Debug)]
pub struct Lexicon {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
    neutral: HashSet<&'static str>,
    emotions: HashMap<&'static str, (&'static str, EmotionCategory)>,
}

const POSITIVE_WORDS: &[&str] = &[
    "feliz",
    "contento",
    "agradecido",
    "tranquilo",
    "alegre",
    "emocionado",
];

const NEGATIVE_WORDS: &[&str] = &[
    "triste",
    "estresado",
    "ansioso",
    "enojado",
    "cansado",
    "deprimido",
    "solo",
];

const NEUTRAL_WORDS: &[&str] = &["ok", "normal", "estándar", "regular"];

const EMOTION_MAP: &[(&str, &str, EmotionCategory)] = &[
    ("feliz", "alegría", EmotionCategory::Positive),
    ("contento", "alegría", EmotionCategory::Positive),
    ("agradecido", "gratitud", EmotionCategory::Positive),
    ("tranquilo", "calma", EmotionCategory::Positive),
    ("alegre", "alegría", EmotionCategory::Positive),
    ("emocionado", "entusiasmo", EmotionCategory::Positive),
    ("triste", "tristeza", EmotionCategory::Negative),
    ("estresado", "estrés", EmotionCategory::Negative),
    ("ansioso", "ansiedad", EmotionCategory::Negative),
    ("enojado", "ira", EmotionCategory::Negative),
    ("cansado", "cansancio", EmotionCategory::Negative),
    ("deprimido", "depresión", EmotionCategory::Negative),
    ("solo", "soledad", EmotionCategory::Negative),
];

static LEXICON: LazyLock<Lexicon> = LazyLock::new(|| Lexicon {
    positive: POSITIVE_WORDS.iter().copied().collect(),
    negative: NEGATIVE_WORDS.iter().copied().collect(),
    neutral: NEUTRAL_WORDS.iter().copied().collect(),
    emotions: EMOTION_MAP
        .iter()
        .map(|&(word, emotion, category)| (word, (emotion, category)))
        .collect(),
});

/// The process-wide lexicon, built on first use and never mutated.
pub fn lexicon() -> &'static Lexicon {
    &LEXICON
}

impl Lexicon {
    /// Polarity of a normalized token, if it is a known keyword.
    pub fn polarity(&self, token: &str) -> Option<Polarity> {
        if self.positive.contains(token) {
            Some(Polarity::Positive)
        } else if self.negative.contains(token) {
            Some(Polarity::Negative)
        } else if self.neutral.contains(token) {
            Some(Polarity::Neutral)
        } else {
            None
        }
    }

    /// Emotion label and category for a normalized token.
    pub fn emotion(&self, token: &str) -> Option<(&'static str, EmotionCategory)> {
        self.emotions.get(token).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_sets_are_disjoint() {
        let lex = lexicon();
        assert!(lex.positive.is_disjoint(&lex.negative));
        assert!(lex.positive.is_disjoint(&lex.neutral));
        assert!(lex.negative.is_disjoint(&lex.neutral));
    }

    #[test]
    fn test_emotion_categories_match_polarity() {
        let lex = lexicon();
        for &(word, _, category) in EMOTION_MAP {
            let expected = match category {
                EmotionCategory::Positive => Polarity::Positive,
                EmotionCategory::Negative => Polarity::Negative,
                EmotionCategory::Neutral => Polarity::Neutral,
            };
            assert_eq!(lex.polarity(word), Some(expected), "{word}");
        }
    }

    #[test]
    fn test_lookup() {
        let lex = lexicon();
        assert_eq!(lex.emotion("solo"), Some(("soledad", EmotionCategory::Negative)));
        assert_eq!(lex.polarity("regular"), Some(Polarity::Neutral));
        assert_eq!(lex.polarity("mesa"), None);
        assert_eq!(lex.emotion("ok"), None);
    }

    #[test]
    fn test_category_parse_and_serde() {
        assert_eq!(EmotionCategory::parse_lenient(" Positiva "), EmotionCategory::Positive);
        assert_eq!(EmotionCategory::parse_lenient("negative"), EmotionCategory::Negative);
        assert_eq!(EmotionCategory::parse_lenient("mixta"), EmotionCategory::Neutral);

        let json = serde_json::to_string(&EmotionCategory::Negative).unwrap();
        assert_eq!(json, "\"negativa\"");
    }
}
