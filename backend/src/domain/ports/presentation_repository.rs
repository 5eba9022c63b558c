//! Port for presentation document persistence.
//!
//! Documents are stored whole as a JSON blob with a handful of mirrored
//! columns for listing; the repository contract deals only in validated
//! domain aggregates.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::presentation::{PresentationDocument, PresentationSummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised by presentation repository adapters.
    pub enum PresentationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "presentation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "presentation repository query failed: {message}",
    }
}

/// Port for presentation persistence and lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PresentationRepository: Send + Sync {
    /// Find a presentation by its id.
    async fn find_by_id(
        &self,
        presentation_id: &Uuid,
    ) -> Result<Option<PresentationDocument>, PresentationRepositoryError>;

    /// List summaries of every presentation, newest first.
    async fn list_summaries(
        &self,
    ) -> Result<Vec<PresentationSummary>, PresentationRepositoryError>;

    /// Create or update a presentation.
    async fn save(
        &self,
        document: &PresentationDocument,
    ) -> Result<(), PresentationRepositoryError>;

    /// Delete a presentation.
    ///
    /// Returns `true` when a row was deleted and `false` when the id did not
    /// exist.
    async fn delete(&self, presentation_id: &Uuid) -> Result<bool, PresentationRepositoryError>;
}

/// In-memory implementation backing tests and local development.
#[derive(Debug, Default)]
pub struct FixturePresentationRepository {
    documents: RwLock<HashMap<Uuid, PresentationDocument>>,
}

impl FixturePresentationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresentationRepository for FixturePresentationRepository {
    async fn find_by_id(
        &self,
        presentation_id: &Uuid,
    ) -> Result<Option<PresentationDocument>, PresentationRepositoryError> {
        Ok(self.documents.read().await.get(presentation_id).cloned())
    }

    async fn list_summaries(
        &self,
    ) -> Result<Vec<PresentationSummary>, PresentationRepositoryError> {
        let mut summaries: Vec<PresentationSummary> = self
            .documents
            .read()
            .await
            .values()
            .map(PresentationDocument::summary)
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    async fn save(
        &self,
        document: &PresentationDocument,
    ) -> Result<(), PresentationRepositoryError> {
        self.documents
            .write()
            .await
            .insert(document.id, document.clone());
        Ok(())
    }

    async fn delete(&self, presentation_id: &Uuid) -> Result<bool, PresentationRepositoryError> {
        Ok(self.documents.write().await.remove(presentation_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::presentation::PresentationRequest;
    use crate::domain::theme::ThemeKind;

    fn document() -> PresentationDocument {
        PresentationDocument::from_request(&PresentationRequest {
            topic: "Composting".to_owned(),
            slide_count: 5,
            theme: ThemeKind::Creative,
            layout_mix: None,
            template_id: None,
        })
        .expect("valid request")
    }

    #[rstest]
    #[tokio::test]
    async fn save_then_find_round_trips() {
        let repo = FixturePresentationRepository::new();
        let doc = document();
        repo.save(&doc).await.expect("save succeeds");
        let found = repo
            .find_by_id(&doc.id)
            .await
            .expect("lookup succeeds")
            .expect("document exists");
        assert_eq!(found, doc);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_reports_whether_a_row_existed() {
        let repo = FixturePresentationRepository::new();
        let doc = document();
        repo.save(&doc).await.expect("save succeeds");
        assert!(repo.delete(&doc.id).await.expect("delete succeeds"));
        assert!(!repo.delete(&doc.id).await.expect("second delete succeeds"));
    }

    #[rstest]
    #[tokio::test]
    async fn summaries_list_newest_first() {
        let repo = FixturePresentationRepository::new();
        let older = document();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let newer = document();
        repo.save(&older).await.expect("save older");
        repo.save(&newer).await.expect("save newer");
        let summaries = repo.list_summaries().await.expect("list succeeds");
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, newer.id);
    }

    #[rstest]
    fn query_error_formats_message() {
        let err = PresentationRepositoryError::query("jsonb decode failed");
        assert!(err.to_string().contains("jsonb decode failed"));
    }
}
