//! Aggregation of annotated records into dashboard and period metrics.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::scorer::round2;

/// Recommendation attached to every generated period metric.
pub const DEFAULT_RECOMMENDATION: &str =
    "Sigue escribiendo cada día para fortalecer tu autoconocimiento emocional.";

/// Emotion annotations of one diary entry or chat message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmotionSample {
    pub emotion: Option<String>,
    pub category: Option<String>,
    pub sentiment: Option<f64>,
}

/// Aggregate numbers shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    #[serde(rename = "total_entradas_diario")]
    pub total_diary_entries: i64,
    #[serde(rename = "emocion_mas_frecuente")]
    pub most_frequent_emotion: Option<String>,
    #[serde(rename = "conteo_emociones")]
    pub emotion_counts: IndexMap<String, u32>,
    #[serde(rename = "promedio_sentimiento_general")]
    pub mean_sentiment: f64,
}

/// Emotion metrics for one user and period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodMetrics {
    /// Category label to share of observed categories. Values sum to 1.0.
    pub proportions: BTreeMap<String, f64>,
    pub mean_sentiment: f64,
    pub dominant: String,
    pub summary: String,
    pub recommendation: String,
}

/// Aggregate samples into dashboard metrics.
///
/// Emotion labels are lowercased before counting. The most frequent emotion
/// is the first label reaching the highest count.
pub fn dashboard_metrics<I>(total_diary_entries: i64, samples: I) -> DashboardMetrics
where
    I: IntoIterator<Item = EmotionSample>,
{
    let mut counts: IndexMap<String, u32> = IndexMap::new();
    let mut total = 0.0;
    let mut n = 0u32;

    for sample in samples {
        if let Some(emotion) = sample.emotion.filter(|e| !e.trim().is_empty()) {
            *counts.entry(emotion.to_lowercase()).or_insert(0) += 1;
        }
        if let Some(value) = sample.sentiment {
            total += value;
            n += 1;
        }
    }

    let mean = if n > 0 { total / f64::from(n) } else { 0.0 };

    DashboardMetrics {
        total_diary_entries,
        most_frequent_emotion: first_max(&counts),
        emotion_counts: counts,
        mean_sentiment: round2(mean),
    }
}

/// Compute period metrics from category-annotated samples.
///
/// Returns `None` when no sample carries a category.
pub fn period_metrics<I>(samples: I) -> Option<PeriodMetrics>
where
    I: IntoIterator<Item = EmotionSample>,
{
    let mut counts: IndexMap<String, u32> = IndexMap::new();
    let mut sentiments = Vec::new();

    for sample in samples {
        if let Some(category) = sample.category.filter(|c| !c.trim().is_empty()) {
            *counts.entry(category).or_insert(0) += 1;
        }
        if let Some(value) = sample.sentiment {
            sentiments.push(value);
        }
    }

    let dominant = first_max(&counts)?;
    let total: u32 = counts.values().sum();
    let proportions = counts
        .iter()
        .map(|(label, count)| (label.clone(), f64::from(*count) / f64::from(total)))
        .collect();

    let mean_sentiment = if sentiments.is_empty() {
        0.0
    } else {
        round2(sentiments.iter().sum::<f64>() / sentiments.len() as f64)
    };

    let summary = format!(
        "Tu estado emocional promedio es {:.2}, con mayor presencia de: {}.",
        mean_sentiment, dominant
    );

    Some(PeriodMetrics {
        proportions,
        mean_sentiment,
        dominant,
        summary,
        recommendation: DEFAULT_RECOMMENDATION.to_string(),
    })
}

fn first_max(counts: &IndexMap<String, u32>) -> Option<String> {
    let mut best: Option<(&String, u32)> = None;
    for (label, &count) in counts {
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(emotion: Option<&str>, category: Option<&str>, sentiment: Option<f64>) -> EmotionSample {
        EmotionSample {
            emotion: emotion.map(str::to_string),
            category: category.map(str::to_string),
            sentiment,
        }
    }

    #[test]
    fn test_dashboard_metrics() {
        let samples = vec![
            sample(Some("Tristeza"), Some("negativa"), Some(-0.5)),
            sample(Some("alegría"), Some("positiva"), Some(0.6)),
            sample(Some("tristeza"), Some("negativa"), Some(-0.2)),
            sample(None, None, None),
        ];

        let metrics = dashboard_metrics(2, samples);
        assert_eq!(metrics.total_diary_entries, 2);
        assert_eq!(metrics.most_frequent_emotion.as_deref(), Some("tristeza"));
        assert_eq!(metrics.emotion_counts.get("tristeza"), Some(&2));
        assert_eq!(metrics.emotion_counts.get("alegría"), Some(&1));
        // (-0.5 + 0.6 - 0.2) / 3 = -0.033
        assert_eq!(metrics.mean_sentiment, -0.03);
    }

    #[test]
    fn test_dashboard_metrics_empty() {
        let metrics = dashboard_metrics(0, Vec::new());
        assert!(metrics.most_frequent_emotion.is_none());
        assert!(metrics.emotion_counts.is_empty());
        assert_eq!(metrics.mean_sentiment, 0.0);
    }

    #[test]
    fn test_dashboard_metrics_tie_first_seen() {
        let samples = vec![
            sample(Some("calma"), None, None),
            sample(Some("ira"), None, None),
        ];
        let metrics = dashboard_metrics(0, samples);
        assert_eq!(metrics.most_frequent_emotion.as_deref(), Some("calma"));
    }

    #[test]
    fn test_dashboard_wire_names() {
        let metrics = dashboard_metrics(1, vec![sample(Some("calma"), None, Some(0.4))]);
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["total_entradas_diario"], 1);
        assert_eq!(json["emocion_mas_frecuente"], "calma");
        assert_eq!(json["conteo_emociones"]["calma"], 1);
        assert_eq!(json["promedio_sentimiento_general"], 0.4);
    }

    #[test]
    fn test_period_proportions_sum_to_one() {
        let samples = vec![
            sample(None, Some("negativa"), Some(-0.4)),
            sample(None, Some("positiva"), Some(0.7)),
            sample(None, Some("negativa"), Some(-0.1)),
            sample(None, None, Some(0.0)),
        ];

        let metrics = period_metrics(samples).unwrap();
        let sum: f64 = metrics.proportions.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((metrics.proportions["negativa"] - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.dominant, "negativa");
        assert_eq!(metrics.mean_sentiment, 0.05);
        assert_eq!(
            metrics.summary,
            "Tu estado emocional promedio es 0.05, con mayor presencia de: negativa."
        );
        assert_eq!(metrics.recommendation, DEFAULT_RECOMMENDATION);
    }

    #[test]
    fn test_period_metrics_without_categories() {
        let samples = vec![sample(Some("alegría"), None, Some(0.3))];
        assert!(period_metrics(samples).is_none());
        assert!(period_metrics(Vec::new()).is_none());
    }
}
