//! Knowledge retrieval contract.

use async_trait::async_trait;

/// A best-effort source of background knowledge for a user query.
///
/// Implementations return `None` when nothing relevant was found. Errors are
/// absorbed by the implementation: retrieval never fails a request.
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    /// Look up a snippet relevant to `query`.
    async fn retrieve(&self, query: &str) -> Option<String>;
}

/// Retriever that never has context.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContextRetriever;

#[async_trait]
impl KnowledgeRetriever for NoContextRetriever {
    async fn retrieve(&self, _query: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_context_retriever() {
        let retriever: Box<dyn KnowledgeRetriever> = Box::new(NoContextRetriever);
        assert!(retriever.retrieve("estrés").await.is_none());
    }
}
