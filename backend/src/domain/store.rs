//! Presentation document store service.
//!
//! Wraps the repository port with the mutation rules: per-presentation
//! serialization through a keyed async lock, conflict checks against the
//! generation state, and the not-found / invalid-request taxonomy. Reads
//! bypass the lock; mutations on distinct ids proceed independently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::error::DomainError;
use super::presentation::{PresentationDocument, PresentationRequest, PresentationSummary};
use super::ports::{PresentationRepository, PresentationRepositoryError};
use super::slide::SlideContent;

/// Keyed async locks, one per presentation id.
#[derive(Debug, Default)]
pub struct MutationLocks {
    inner: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl MutationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one presentation id.
    pub async fn acquire(&self, id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            Arc::clone(map.entry(id).or_default())
        };
        lock.lock_owned().await
    }

    /// Drop the lock entry for a deleted presentation.
    pub async fn forget(&self, id: Uuid) {
        self.inner.lock().await.remove(&id);
    }
}

/// Store service over a [`PresentationRepository`].
pub struct PresentationStore<R>
where
    R: PresentationRepository + ?Sized,
{
    repository: Arc<R>,
    locks: Arc<MutationLocks>,
}

impl<R> Clone for PresentationStore<R>
where
    R: PresentationRepository + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<R> PresentationStore<R>
where
    R: PresentationRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            locks: Arc::new(MutationLocks::new()),
        }
    }

    /// Repository handle, shared with the generation pipeline.
    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    /// Lock registry, shared with the pipeline and the export service.
    pub fn locks(&self) -> Arc<MutationLocks> {
        Arc::clone(&self.locks)
    }

    /// Create a pending presentation and persist it.
    ///
    /// # Errors
    ///
    /// Propagates request validation and repository failures.
    pub async fn create(
        &self,
        request: &PresentationRequest,
    ) -> Result<PresentationDocument, DomainError> {
        let document = PresentationDocument::from_request(request)?;
        self.repository
            .save(&document)
            .await
            .map_err(map_repository_error)?;
        Ok(document)
    }

    /// Load a presentation by id.
    ///
    /// # Errors
    ///
    /// Returns `not_found` for an unknown id.
    pub async fn get(&self, id: Uuid) -> Result<PresentationDocument, DomainError> {
        self.repository
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| DomainError::not_found(format!("no presentation {id}")))
    }

    /// List presentation summaries, newest first.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn list(&self) -> Result<Vec<PresentationSummary>, DomainError> {
        self.repository
            .list_summaries()
            .await
            .map_err(map_repository_error)
    }

    /// Replace one slide's content.
    ///
    /// # Errors
    ///
    /// Returns `not_found`, `conflict`, or `invalid_request` per the
    /// document rules.
    pub async fn patch_slide(
        &self,
        id: Uuid,
        slide_id: Uuid,
        content: SlideContent,
    ) -> Result<PresentationDocument, DomainError> {
        let _guard = self.locks.acquire(id).await;
        let mut document = self.get(id).await?;
        document.patch_slide(slide_id, content)?;
        self.repository
            .save(&document)
            .await
            .map_err(map_repository_error)?;
        Ok(document)
    }

    /// Reorder slides by id.
    ///
    /// # Errors
    ///
    /// Returns `not_found`, `conflict`, or `invalid_request` per the
    /// document rules.
    pub async fn reorder_slides(
        &self,
        id: Uuid,
        order: &[Uuid],
    ) -> Result<PresentationDocument, DomainError> {
        let _guard = self.locks.acquire(id).await;
        let mut document = self.get(id).await?;
        document.reorder_slides(order)?;
        self.repository
            .save(&document)
            .await
            .map_err(map_repository_error)?;
        Ok(document)
    }

    /// Delete a presentation.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when the id does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let deleted = {
            let _guard = self.locks.acquire(id).await;
            self.repository
                .delete(&id)
                .await
                .map_err(map_repository_error)?
        };
        if !deleted {
            return Err(DomainError::not_found(format!("no presentation {id}")));
        }
        self.locks.forget(id).await;
        Ok(())
    }

    /// Record a completed export under the mutation lock.
    ///
    /// # Errors
    ///
    /// Returns `not_found` for an unknown id and propagates repository
    /// failures.
    pub async fn record_export(&self, id: Uuid, url: &str) -> Result<(), DomainError> {
        let _guard = self.locks.acquire(id).await;
        let mut document = self.get(id).await?;
        document.mark_exported(url);
        self.repository
            .save(&document)
            .await
            .map_err(map_repository_error)
    }
}

/// Repository failures surface as internal errors; they carry no client
/// meaning.
pub(crate) fn map_repository_error(error: PresentationRepositoryError) -> DomainError {
    DomainError::internal(error.to_string())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::layout::LayoutKind;
    use crate::domain::ports::FixturePresentationRepository;
    use crate::domain::slide::Slide;
    use crate::domain::theme::ThemeKind;
    use crate::domain::ErrorCode;

    fn request() -> PresentationRequest {
        PresentationRequest {
            topic: "Night photography".to_owned(),
            slide_count: 3,
            theme: ThemeKind::Dark,
            layout_mix: None,
            template_id: None,
        }
    }

    fn text_slide(title: &str) -> Slide {
        Slide::new(SlideContent::TextOnly {
            title: title.to_owned(),
            bullets: vec!["A point".to_owned()],
            key_insight: None,
        })
        .expect("valid slide")
    }

    #[fixture]
    fn store() -> PresentationStore<FixturePresentationRepository> {
        PresentationStore::new(Arc::new(FixturePresentationRepository::new()))
    }

    async fn ready_presentation(
        store: &PresentationStore<FixturePresentationRepository>,
    ) -> PresentationDocument {
        let mut document = store.create(&request()).await.expect("creates");
        document.begin_generation().expect("starts");
        document
            .complete_generation(
                "Night photography".to_owned(),
                String::new(),
                vec![text_slide("One"), text_slide("Two"), text_slide("Three")],
                vec![LayoutKind::TextOnly; 3],
            )
            .expect("completes");
        store
            .repository()
            .save(&document)
            .await
            .expect("saves ready state");
        document
    }

    #[rstest]
    #[tokio::test]
    async fn create_persists_a_pending_document(
        store: PresentationStore<FixturePresentationRepository>,
    ) {
        let document = store.create(&request()).await.expect("creates");
        let loaded = store.get(document.id).await.expect("loads");
        assert!(loaded.state.is_in_flight());
        assert_eq!(loaded.slides_count(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn get_unknown_id_is_not_found(
        store: PresentationStore<FixturePresentationRepository>,
    ) {
        let err = store.get(Uuid::new_v4()).await.expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn mutations_conflict_while_generating(
        store: PresentationStore<FixturePresentationRepository>,
    ) {
        let document = store.create(&request()).await.expect("creates");
        let err = store
            .reorder_slides(document.id, &[])
            .await
            .expect_err("pending rejects mutation");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_missing_id_is_not_found(
        store: PresentationStore<FixturePresentationRepository>,
    ) {
        let err = store.delete(Uuid::new_v4()).await.expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_twice_reports_not_found_the_second_time(
        store: PresentationStore<FixturePresentationRepository>,
    ) {
        let document = store.create(&request()).await.expect("creates");
        store.delete(document.id).await.expect("first delete");
        let err = store.delete(document.id).await.expect_err("second delete");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn patch_and_reorder_persist_their_changes(
        store: PresentationStore<FixturePresentationRepository>,
    ) {
        let document = ready_presentation(&store).await;
        let ids: Vec<Uuid> = document.slides.iter().map(|s| s.id).collect();

        store
            .patch_slide(
                document.id,
                ids[0],
                SlideContent::TextOnly {
                    title: "Edited".to_owned(),
                    bullets: vec!["New".to_owned()],
                    key_insight: None,
                },
            )
            .await
            .expect("patch applies");

        let mut reversed = ids.clone();
        reversed.reverse();
        store
            .reorder_slides(document.id, &reversed)
            .await
            .expect("reorder applies");

        let loaded = store.get(document.id).await.expect("loads");
        assert_eq!(loaded.slides[2].content.title(), "Edited");
        let loaded_ids: Vec<Uuid> = loaded.slides.iter().map(|s| s.id).collect();
        assert_eq!(loaded_ids, reversed);
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_mutations_on_one_id_serialise(
        store: PresentationStore<FixturePresentationRepository>,
    ) {
        let document = ready_presentation(&store).await;
        let ids: Vec<Uuid> = document.slides.iter().map(|s| s.id).collect();

        let mut tasks = tokio::task::JoinSet::new();
        for round in 0..8_u64 {
            let store = store.clone();
            let id = document.id;
            let mut order = ids.clone();
            if round % 2 == 0 {
                order.reverse();
            }
            tasks.spawn(async move { store.reorder_slides(id, &order).await });
        }
        while let Some(result) = tasks.join_next().await {
            result.expect("task completes").expect("reorder succeeds");
        }

        let loaded = store.get(document.id).await.expect("loads");
        // Every slide survives every interleaving.
        assert_eq!(loaded.slides_count(), 3);
        let final_ids: std::collections::HashSet<Uuid> =
            loaded.slides.iter().map(|s| s.id).collect();
        assert_eq!(final_ids, ids.iter().copied().collect());
    }
}
