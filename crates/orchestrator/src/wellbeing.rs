//! Profile, feedback, wellbeing content and progress.
//!
//! These are thin validated wrappers over the record store.

use database::validation::{
    validate_length, validate_required, validate_score, MAX_COMMENT_LENGTH, MAX_TITLE_LENGTH,
};
use database::{
    chat_message, feedback, progress, user, wellbeing, Challenge, Feedback, NewChallenge,
    NewRecommendation, Page, Progress, Recommendation, UserChallenge, UserProfile,
};
use tracing::info;

use crate::diary::validate_paging;
use crate::error::OrchestratorError;
use crate::orchestrator::Orchestrator;

impl Orchestrator {
    /// The user's profile, created on first access.
    pub async fn profile(
        &self,
        user_id: &str,
        email: Option<&str>,
    ) -> Result<UserProfile, OrchestratorError> {
        match user::find_user(self.db.pool(), user_id).await? {
            Some(profile) => Ok(profile),
            None => Ok(user::upsert_user(self.db.pool(), user_id, None, email).await?),
        }
    }

    /// Set the user's display name.
    pub async fn update_profile_name(
        &self,
        user_id: &str,
        name: &str,
        email: Option<&str>,
    ) -> Result<UserProfile, OrchestratorError> {
        validate_required("nombre", name, MAX_TITLE_LENGTH)?;
        let profile = user::upsert_user(self.db.pool(), user_id, Some(name.trim()), email).await?;
        info!(user_id, "Profile updated");
        Ok(profile)
    }

    /// Rate one of the user's chat messages.
    ///
    /// Unknown (or foreign) messages are not found; rating twice conflicts.
    pub async fn submit_feedback(
        &self,
        user_id: &str,
        message_id: i64,
        score: i64,
        comment: Option<&str>,
    ) -> Result<Feedback, OrchestratorError> {
        validate_score(score)?;
        if let Some(comment) = comment {
            validate_length("comentario", comment, MAX_COMMENT_LENGTH)?;
        }

        chat_message::get_message(self.db.pool(), user_id, message_id).await?;
        let created =
            feedback::create_feedback(self.db.pool(), user_id, message_id, score, comment).await?;
        info!(user_id, message_id, score, "Feedback stored");
        Ok(created)
    }

    /// Ratings the user has given, newest first.
    pub async fn list_feedback(&self, user_id: &str) -> Result<Vec<Feedback>, OrchestratorError> {
        Ok(feedback::list_feedback(self.db.pool(), user_id).await?)
    }

    /// Public list of recommendations.
    pub async fn list_recommendations(
        &self,
        category: Option<&str>,
        query: Option<&str>,
        page: i64,
        page_size: i64,
    ) -> Result<Page<Recommendation>, OrchestratorError> {
        validate_paging(page, page_size)?;
        let offset = (page - 1).saturating_mul(page_size);
        Ok(wellbeing::list_recommendations(self.db.pool(), category, query, page_size, offset).await?)
    }

    /// Publish a recommendation.
    pub async fn create_recommendation(
        &self,
        new: NewRecommendation,
    ) -> Result<Recommendation, OrchestratorError> {
        validate_required("titulo", &new.title, MAX_TITLE_LENGTH)?;
        Ok(wellbeing::create_recommendation(self.db.pool(), &new).await?)
    }

    /// Public list of challenges.
    pub async fn list_challenges(
        &self,
        difficulty: Option<&str>,
        page: i64,
        page_size: i64,
    ) -> Result<Page<Challenge>, OrchestratorError> {
        validate_paging(page, page_size)?;
        let offset = (page - 1).saturating_mul(page_size);
        Ok(wellbeing::list_challenges(self.db.pool(), difficulty, page_size, offset).await?)
    }

    /// Publish a challenge.
    pub async fn create_challenge(&self, new: NewChallenge) -> Result<Challenge, OrchestratorError> {
        validate_required("descripcion", &new.description, MAX_COMMENT_LENGTH)?;
        Ok(wellbeing::create_challenge(self.db.pool(), &new).await?)
    }

    /// Assign a challenge to the user.
    pub async fn assign_challenge(
        &self,
        user_id: &str,
        challenge_id: i64,
    ) -> Result<UserChallenge, OrchestratorError> {
        let assignment = wellbeing::assign_challenge(self.db.pool(), user_id, challenge_id).await?;
        info!(user_id, challenge_id, "Challenge assigned");
        Ok(assignment)
    }

    /// Mark one of the user's assignments completed.
    pub async fn complete_challenge(
        &self,
        user_id: &str,
        assignment_id: i64,
    ) -> Result<UserChallenge, OrchestratorError> {
        Ok(wellbeing::complete_challenge(self.db.pool(), user_id, assignment_id).await?)
    }

    /// The user's assignments, optionally filtered by completion.
    pub async fn list_user_challenges(
        &self,
        user_id: &str,
        completed: Option<bool>,
    ) -> Result<Vec<UserChallenge>, OrchestratorError> {
        Ok(wellbeing::list_user_challenges(self.db.pool(), user_id, completed).await?)
    }

    /// The user's progress summary.
    pub async fn progress(&self, user_id: &str) -> Result<Progress, OrchestratorError> {
        Ok(progress::get_progress(self.db.pool(), user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use database::DatabaseError;

    use crate::error::OrchestratorError;
    use crate::scripted::ScriptedBrain;
    use crate::testing::test_orchestrator;

    #[tokio::test]
    async fn test_profile_created_on_first_access() {
        let orch = test_orchestrator(Arc::new(ScriptedBrain)).await;

        let profile = orch.profile("u1", Some("ana@example.com")).await.unwrap();
        assert_eq!(profile.name, None);
        assert_eq!(profile.email.as_deref(), Some("ana@example.com"));

        let renamed = orch.update_profile_name("u1", "  Ana ", None).await.unwrap();
        assert_eq!(renamed.name.as_deref(), Some("Ana"));

        assert!(matches!(
            orch.update_profile_name("u1", " ", None).await,
            Err(OrchestratorError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_feedback_rules() {
        let orch = test_orchestrator(Arc::new(ScriptedBrain)).await;
        let exchange = orch.invoke_chat("u1", "hola").await.unwrap();
        let reply_id = exchange.assistant_message.id;

        assert!(matches!(
            orch.submit_feedback("u1", reply_id, 6, None).await,
            Err(OrchestratorError::Validation(_))
        ));
        assert!(matches!(
            orch.submit_feedback("u1", 999, 4, None).await,
            Err(OrchestratorError::Database(DatabaseError::NotFound { .. }))
        ));
        assert!(matches!(
            orch.submit_feedback("u2", reply_id, 4, None).await,
            Err(OrchestratorError::Database(DatabaseError::NotFound { .. }))
        ));

        let created = orch
            .submit_feedback("u1", reply_id, 4, Some("me ayudó"))
            .await
            .unwrap();
        assert_eq!(created.score, 4);

        assert!(matches!(
            orch.submit_feedback("u1", reply_id, 5, None).await,
            Err(OrchestratorError::Database(DatabaseError::AlreadyExists { .. }))
        ));

        let mine = orch.list_feedback("u1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].comment.as_deref(), Some("me ayudó"));
        assert!(orch.list_feedback("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_challenges_and_progress() {
        let orch = test_orchestrator(Arc::new(ScriptedBrain)).await;

        let challenge = orch
            .create_challenge(database::NewChallenge {
                description: "Escribe tres cosas que agradeces".to_string(),
                icon: Some("🙏".to_string()),
                difficulty: Some("facil".to_string()),
            })
            .await
            .unwrap();

        let assignment = orch.assign_challenge("u1", challenge.id).await.unwrap();
        orch.complete_challenge("u1", assignment.id).await.unwrap();
        orch.invoke_chat("u1", "hola").await.unwrap();

        let progress = orch.progress("u1").await.unwrap();
        assert_eq!(progress.challenges_completed, 1);
        assert_eq!(progress.interactions_with_assistant, 1);
        assert_eq!(progress.total_reflections, 0);

        let listed = orch.list_challenges(None, 1, 20).await.unwrap();
        assert_eq!(listed.total, 1);
        assert!(orch.list_challenges(None, 0, 20).await.is_err());

        assert!(matches!(
            orch.create_recommendation(database::NewRecommendation::default()).await,
            Err(OrchestratorError::Validation(_))
        ));
    }
}
