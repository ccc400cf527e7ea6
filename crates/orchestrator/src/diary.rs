//! Diary flows.
//!
//! Creation is insert-then-update: the raw entry is stored first and the
//! derived fields are written in a second step. Analysis problems never fail
//! the request; the raw entry is returned instead.

use database::validation::{
    validate_date, validate_length, validate_required, MAX_CONTENT_LENGTH, MAX_TITLE_LENGTH,
};
use database::{diary, DiaryEnrichment, DiaryEntry, DiaryFilter, NewDiaryEntry, Page, ValidationError};
use sentiment::DiaryAnalysis;
use tracing::{info, warn};

use crate::error::OrchestratorError;
use crate::orchestrator::Orchestrator;

/// Default page size for diary listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page size accepted for listings.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A diary entry to create.
#[derive(Debug, Clone, Default)]
pub struct CreateDiaryEntry {
    pub entry_date: Option<String>,
    pub title: Option<String>,
    pub content: String,
}

/// A partial update to a diary entry.
#[derive(Debug, Clone, Default)]
pub struct DiaryPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Listing parameters for a user's diary.
#[derive(Debug, Clone)]
pub struct DiaryQuery {
    pub page: i64,
    pub page_size: i64,
    pub filter: DiaryFilter,
}

impl Default for DiaryQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            filter: DiaryFilter::default(),
        }
    }
}

/// One page of diary entries.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DiaryPage {
    pub items: Vec<DiaryEntry>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

fn to_enrichment(analysis: DiaryAnalysis) -> DiaryEnrichment {
    DiaryEnrichment {
        summary: analysis.summary,
        predominant_emotion: analysis.emotion,
        emotion_category: analysis.category.label().to_string(),
        sentiment: analysis.sentiment,
        model_source: analysis.model_source,
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Check page bounds: `page >= 1`, `1 <= page_size <= 100`.
pub fn validate_paging(page: i64, page_size: i64) -> Result<(), ValidationError> {
    if page < 1 {
        return Err(ValidationError::OutOfRange {
            field: "page".to_string(),
            min: 1,
            max: i64::MAX,
            actual: page,
        });
    }
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(ValidationError::OutOfRange {
            field: "page_size".to_string(),
            min: 1,
            max: MAX_PAGE_SIZE,
            actual: page_size,
        });
    }
    Ok(())
}

impl Orchestrator {
    /// Create a diary entry and enrich it on a best-effort basis.
    ///
    /// Fails only if the raw insert fails. If analysis or the enrichment
    /// update fails, the raw entry (no derived fields) is returned.
    pub async fn create_diary_entry(
        &self,
        user_id: &str,
        input: CreateDiaryEntry,
    ) -> Result<DiaryEntry, OrchestratorError> {
        validate_required("contenido", &input.content, MAX_CONTENT_LENGTH)?;
        if let Some(title) = &input.title {
            validate_length("titulo", title, MAX_TITLE_LENGTH)?;
        }
        if let Some(date) = &input.entry_date {
            validate_date("fecha", date)?;
        }

        let new_entry = NewDiaryEntry {
            user_id: user_id.to_string(),
            entry_date: input.entry_date,
            title: blank_to_none(input.title),
            content: input.content,
        };

        let raw = diary::insert_entry(self.db.pool(), &new_entry).await?;
        info!(user_id, entry_id = raw.id, "Diary entry stored");

        Ok(self.try_enrich(&raw).await.unwrap_or(raw))
    }

    /// Run analysis for a stored entry and write the derived fields.
    ///
    /// Returns `None` (after logging) if analysis or the update failed.
    async fn try_enrich(&self, entry: &DiaryEntry) -> Option<DiaryEntry> {
        let analysis = match self.analyzer.analyze(&entry.content).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(
                    user_id = %entry.user_id,
                    entry_id = entry.id,
                    analyzer = self.analyzer.name(),
                    error = %e,
                    "Diary analysis failed"
                );
                return None;
            }
        };

        let enrichment = to_enrichment(analysis);
        match diary::set_enrichment(self.db.pool(), &entry.user_id, entry.id, &enrichment).await {
            Ok(enriched) => {
                info!(
                    user_id = %entry.user_id,
                    entry_id = entry.id,
                    emotion = %enrichment.predominant_emotion,
                    "Diary entry enriched"
                );
                Some(enriched)
            }
            Err(e) => {
                warn!(
                    user_id = %entry.user_id,
                    entry_id = entry.id,
                    error = %e,
                    "Storing diary analysis failed"
                );
                None
            }
        }
    }

    /// Get one of the user's diary entries.
    pub async fn get_diary_entry(
        &self,
        user_id: &str,
        id: i64,
    ) -> Result<DiaryEntry, OrchestratorError> {
        Ok(diary::get_entry(self.db.pool(), user_id, id).await?)
    }

    /// List the user's diary entries, newest first.
    pub async fn list_diary_entries(
        &self,
        user_id: &str,
        query: DiaryQuery,
    ) -> Result<DiaryPage, OrchestratorError> {
        validate_paging(query.page, query.page_size)?;
        if let Some(date) = &query.filter.from_date {
            validate_date("from_date", date)?;
        }
        if let Some(date) = &query.filter.to_date {
            validate_date("to_date", date)?;
        }

        let offset = (query.page - 1).saturating_mul(query.page_size);
        let Page { items, total } =
            diary::list_entries(self.db.pool(), user_id, &query.filter, query.page_size, offset)
                .await?;

        Ok(DiaryPage {
            items,
            page: query.page,
            page_size: query.page_size,
            total,
        })
    }

    /// Update title and/or content of an entry.
    ///
    /// A blank title clears it, as on create.
    /// A content change re-runs analysis. If that fails, the old derived
    /// fields are cleared so they never describe text that is gone.
    pub async fn update_diary_entry(
        &self,
        user_id: &str,
        id: i64,
        patch: DiaryPatch,
    ) -> Result<DiaryEntry, OrchestratorError> {
        if patch.title.is_none() && patch.content.is_none() {
            return Err(ValidationError::Empty("titulo o contenido".to_string()).into());
        }
        if let Some(title) = &patch.title {
            validate_length("titulo", title, MAX_TITLE_LENGTH)?;
        }
        if let Some(content) = &patch.content {
            validate_required("contenido", content, MAX_CONTENT_LENGTH)?;
        }

        let current = diary::get_entry(self.db.pool(), user_id, id).await?;
        let content_changed = patch
            .content
            .as_deref()
            .is_some_and(|content| content != current.content);

        let title = patch
            .title
            .as_deref()
            .map(|t| Some(t).filter(|t| !t.trim().is_empty()));
        let updated = diary::update_entry(
            self.db.pool(),
            user_id,
            id,
            title,
            patch.content.as_deref(),
        )
        .await?;
        info!(user_id, entry_id = id, content_changed, "Diary entry updated");

        if !content_changed {
            return Ok(updated);
        }

        match self.try_enrich(&updated).await {
            Some(enriched) => Ok(enriched),
            None => {
                warn!(user_id, entry_id = id, "Clearing stale diary analysis");
                Ok(diary::clear_enrichment(self.db.pool(), user_id, id).await?)
            }
        }
    }

    /// Delete one of the user's diary entries.
    pub async fn delete_diary_entry(&self, user_id: &str, id: i64) -> Result<(), OrchestratorError> {
        diary::delete_entry(self.db.pool(), user_id, id).await?;
        info!(user_id, entry_id = id, "Diary entry deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::analyzer::LlmAnalyzer;
    use crate::scripted::ScriptedBrain;
    use crate::testing::{test_orchestrator, FixedModel};

    fn entry(content: &str) -> CreateDiaryEntry {
        CreateDiaryEntry {
            entry_date: Some("2026-10-19".to_string()),
            title: Some("Lunes".to_string()),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_enriches_with_heuristic() {
        let orch = test_orchestrator(Arc::new(ScriptedBrain)).await;

        let stored = orch
            .create_diary_entry("u1", entry("feliz feliz triste"))
            .await
            .unwrap();

        let enrichment = stored.enrichment().unwrap();
        assert_eq!(enrichment.predominant_emotion, "alegría");
        assert_eq!(enrichment.emotion_category, "positiva");
        assert_eq!(enrichment.sentiment, 0.58);
        assert_eq!(enrichment.model_source, "heuristic-v1");
    }

    #[tokio::test]
    async fn test_create_without_keywords_is_neutral() {
        let orch = test_orchestrator(Arc::new(ScriptedBrain)).await;
        let stored = orch
            .create_diary_entry("u1", entry("fui al mercado"))
            .await
            .unwrap();

        assert_eq!(stored.predominant_emotion.as_deref(), Some("neutral"));
        assert_eq!(stored.emotion_category.as_deref(), Some("neutra"));
        assert_eq!(stored.sentiment, Some(0.0));
    }

    #[tokio::test]
    async fn test_create_with_failing_analysis_returns_raw() {
        let failing = Arc::new(FixedModel::failing());
        let orch = test_orchestrator(Arc::new(ScriptedBrain))
            .await
            .with_analyzer(Arc::new(LlmAnalyzer::new(failing, "gpt-4o-mini")));

        let stored = orch.create_diary_entry("u1", entry("feliz")).await.unwrap();

        assert!(stored.summary.is_none());
        assert!(stored.predominant_emotion.is_none());
        assert!(stored.emotion_category.is_none());
        assert!(stored.sentiment.is_none());
        assert!(stored.model_source.is_none());

        // The raw record is persisted
        let fetched = orch.get_diary_entry("u1", stored.id).await.unwrap();
        assert_eq!(fetched.content, "feliz");
    }

    #[tokio::test]
    async fn test_create_with_unparseable_analysis_returns_raw() {
        let model = Arc::new(FixedModel::replying("lo siento, no puedo"));
        let orch = test_orchestrator(Arc::new(ScriptedBrain))
            .await
            .with_analyzer(Arc::new(LlmAnalyzer::new(model, "gpt-4o-mini")));

        let stored = orch.create_diary_entry("u1", entry("feliz")).await.unwrap();
        assert!(stored.enrichment().is_none());
    }

    #[tokio::test]
    async fn test_create_validation() {
        let orch = test_orchestrator(Arc::new(ScriptedBrain)).await;

        assert!(matches!(
            orch.create_diary_entry("u1", entry("   ")).await,
            Err(OrchestratorError::Validation(_))
        ));

        let bad_date = CreateDiaryEntry {
            entry_date: Some("19-10-2026".to_string()),
            ..entry("hola")
        };
        assert!(matches!(
            orch.create_diary_entry("u1", bad_date).await,
            Err(OrchestratorError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_content_reanalyzes() {
        let orch = test_orchestrator(Arc::new(ScriptedBrain)).await;
        let stored = orch.create_diary_entry("u1", entry("feliz")).await.unwrap();

        let updated = orch
            .update_diary_entry(
                "u1",
                stored.id,
                DiaryPatch {
                    title: None,
                    content: Some("muy triste".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title.as_deref(), Some("Lunes"));
        assert_eq!(updated.predominant_emotion.as_deref(), Some("tristeza"));
    }

    #[tokio::test]
    async fn test_update_with_failing_reanalysis_clears_enrichment() {
        let orch = test_orchestrator(Arc::new(ScriptedBrain)).await;
        let stored = orch.create_diary_entry("u1", entry("feliz")).await.unwrap();
        assert!(stored.enrichment().is_some());

        let orch = orch.with_analyzer(Arc::new(LlmAnalyzer::new(
            Arc::new(FixedModel::failing()),
            "gpt-4o-mini",
        )));
        let updated = orch
            .update_diary_entry(
                "u1",
                stored.id,
                DiaryPatch {
                    title: None,
                    content: Some("otro texto".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.content, "otro texto");
        assert!(updated.summary.is_none());
        assert!(updated.predominant_emotion.is_none());
        assert!(updated.sentiment.is_none());
        assert!(updated.model_source.is_none());
    }

    #[tokio::test]
    async fn test_update_title_only_keeps_enrichment() {
        let orch = test_orchestrator(Arc::new(ScriptedBrain)).await;
        let stored = orch.create_diary_entry("u1", entry("feliz")).await.unwrap();

        let updated = orch
            .update_diary_entry(
                "u1",
                stored.id,
                DiaryPatch {
                    title: Some("Martes".to_string()),
                    content: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title.as_deref(), Some("Martes"));
        assert_eq!(updated.enrichment(), stored.enrichment());

        let untitled = orch
            .update_diary_entry(
                "u1",
                stored.id,
                DiaryPatch {
                    title: Some("  ".to_string()),
                    content: None,
                },
            )
            .await
            .unwrap();
        assert!(untitled.title.is_none());
        assert_eq!(untitled.content, stored.content);

        assert!(matches!(
            orch.update_diary_entry("u1", stored.id, DiaryPatch::default()).await,
            Err(OrchestratorError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_and_delete_are_owner_scoped() {
        let orch = test_orchestrator(Arc::new(ScriptedBrain)).await;
        let mine = orch.create_diary_entry("u1", entry("feliz")).await.unwrap();
        orch.create_diary_entry("u2", entry("triste")).await.unwrap();

        let page = orch
            .list_diary_entries("u1", DiaryQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);

        assert!(matches!(
            orch.delete_diary_entry("u2", mine.id).await,
            Err(OrchestratorError::Database(database::DatabaseError::NotFound { .. }))
        ));
        orch.delete_diary_entry("u1", mine.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_rejects_bad_paging() {
        let orch = test_orchestrator(Arc::new(ScriptedBrain)).await;
        let query = DiaryQuery {
            page_size: 101,
            ..Default::default()
        };
        assert!(matches!(
            orch.list_diary_entries("u1", query).await,
            Err(OrchestratorError::Validation(_))
        ));
        assert!(validate_paging(0, 20).is_err());
        assert!(validate_paging(1, 100).is_ok());
    }
}
