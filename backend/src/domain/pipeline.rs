//! The generation pipeline: one spawned task per created presentation.
//!
//! The pipeline owns the document from `Pending` until it settles. Content
//! generation and image enrichment happen outside the mutation lock; the
//! state writes at either end take it, so user mutations and the pipeline
//! never interleave on the same row.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{error, info};
use uuid::Uuid;

use super::enricher::ImageEnricher;
use super::error::DomainError;
use super::generator::ContentGenerator;
use super::ports::{ImageSearch, PresentationRepository, TextGenerator};
use super::presentation::PresentationRequest;
use super::store::{map_repository_error, MutationLocks};

/// Generation pipeline wiring: generator, enricher, and persistence.
pub struct GenerationPipeline<T, S, R>
where
    T: TextGenerator + ?Sized + 'static,
    S: ImageSearch + ?Sized + 'static,
    R: PresentationRepository + ?Sized + 'static,
{
    generator: ContentGenerator<T>,
    enricher: ImageEnricher<S>,
    repository: Arc<R>,
    locks: Arc<MutationLocks>,
}

impl<T, S, R> GenerationPipeline<T, S, R>
where
    T: TextGenerator + ?Sized + 'static,
    S: ImageSearch + ?Sized + 'static,
    R: PresentationRepository + ?Sized + 'static,
{
    pub fn new(
        generator: ContentGenerator<T>,
        enricher: ImageEnricher<S>,
        repository: Arc<R>,
        locks: Arc<MutationLocks>,
    ) -> Self {
        Self {
            generator,
            enricher,
            repository,
            locks,
        }
    }

    /// Spawn the pipeline for one presentation.
    pub fn spawn(self: Arc<Self>, id: Uuid, request: PresentationRequest) {
        tokio::spawn(async move {
            if let Err(error) = self.run(id, request).await {
                error!(presentation_id = %id, %error, "generation pipeline failed");
            }
        });
    }

    /// Run the pipeline to completion. The document ends `Ready` or
    /// `Failed`, never silently partial.
    ///
    /// # Errors
    ///
    /// Returns the pipeline-fatal failure after recording it on the
    /// document. A repository failure while recording surfaces as internal.
    pub async fn run(&self, id: Uuid, request: PresentationRequest) -> Result<(), DomainError> {
        self.transition_to_generating(id).await?;

        let outcome = self.generate_and_enrich(&request).await;

        let _guard = self.locks.acquire(id).await;
        let mut document = self
            .repository
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| DomainError::not_found(format!("no presentation {id}")))?;

        match outcome {
            Ok(deck) => {
                document.complete_generation(
                    deck.title,
                    deck.description,
                    deck.slides,
                    deck.layout_order,
                )?;
                self.repository
                    .save(&document)
                    .await
                    .map_err(map_repository_error)?;
                info!(
                    presentation_id = %id,
                    slides = document.slides_count(),
                    "presentation ready"
                );
                Ok(())
            }
            Err(error) => {
                document.fail_generation(error.message())?;
                self.repository
                    .save(&document)
                    .await
                    .map_err(map_repository_error)?;
                Err(error)
            }
        }
    }

    async fn transition_to_generating(&self, id: Uuid) -> Result<(), DomainError> {
        let _guard = self.locks.acquire(id).await;
        let mut document = self
            .repository
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| DomainError::not_found(format!("no presentation {id}")))?;
        document.begin_generation()?;
        self.repository
            .save(&document)
            .await
            .map_err(map_repository_error)
    }

    async fn generate_and_enrich(
        &self,
        request: &PresentationRequest,
    ) -> Result<super::generator::GeneratedDeck, DomainError> {
        let mut rng = SmallRng::from_entropy();
        let mut deck = self.generator.generate(request, &mut rng).await?;
        self.enricher.enrich_slides(&mut deck.slides).await;
        Ok(deck)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::enricher::DEFAULT_QUERY_TIMEOUT;
    use crate::domain::ports::{
        FixturePresentationRepository, FixtureTextGenerator, ImageHit, MockImageSearch,
        MockTextGenerator, TextGenerationError,
    };
    use crate::domain::presentation::GenerationState;
    use crate::domain::store::PresentationStore;
    use crate::domain::theme::ThemeKind;

    fn request() -> PresentationRequest {
        PresentationRequest {
            topic: "Coral reefs".to_owned(),
            slide_count: 6,
            theme: ThemeKind::Gradient,
            layout_mix: None,
            template_id: None,
        }
    }

    fn pipeline_with<T>(
        generator: T,
        search: MockImageSearch,
        store: &PresentationStore<FixturePresentationRepository>,
    ) -> GenerationPipeline<T, MockImageSearch, FixturePresentationRepository>
    where
        T: TextGenerator + 'static,
    {
        GenerationPipeline::new(
            ContentGenerator::new(Arc::new(generator)),
            ImageEnricher::new(Arc::new(search), DEFAULT_QUERY_TIMEOUT),
            store.repository(),
            store.locks(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn a_successful_run_ends_ready_with_enriched_slides() {
        let store = PresentationStore::new(Arc::new(FixturePresentationRepository::new()));
        let document = store.create(&request()).await.expect("creates");

        let mut search = MockImageSearch::new();
        search.expect_search().returning(|query| {
            Ok(Some(ImageHit {
                url: format!("https://images.example/{query}.jpg"),
                alt: query.to_owned(),
                author_name: "Ana".to_owned(),
                author_url: "https://photos.example/@ana".to_owned(),
                download_location: None,
            }))
        });

        let pipeline = pipeline_with(FixtureTextGenerator, search, &store);
        pipeline
            .run(document.id, request())
            .await
            .expect("pipeline succeeds");

        let loaded = store.get(document.id).await.expect("loads");
        assert_eq!(loaded.state, GenerationState::Ready);
        assert_eq!(loaded.slides_count(), 6);
        assert_eq!(
            loaded.layout_order.as_ref().map(Vec::len),
            Some(6),
            "layout order covers every slide"
        );
        for slide in &loaded.slides {
            if let Some(slot) = slide.content.image_slot() {
                assert!(slot.resolved.is_some(), "image slots are enriched");
            }
        }
    }

    #[rstest]
    #[tokio::test]
    async fn outline_failure_leaves_the_document_failed_with_a_reason() {
        let store = PresentationStore::new(Arc::new(FixturePresentationRepository::new()));
        let document = store.create(&request()).await.expect("creates");

        let mut generator = MockTextGenerator::new();
        generator
            .expect_outline()
            .returning(|_| Err(TextGenerationError::transport("model outage")));
        generator.expect_slide_body().never();
        let mut search = MockImageSearch::new();
        search.expect_search().never();

        let pipeline = pipeline_with(generator, search, &store);
        pipeline
            .run(document.id, request())
            .await
            .expect_err("fatal failure propagates");

        let loaded = store.get(document.id).await.expect("loads");
        match loaded.state {
            GenerationState::Failed { ref reason } => assert!(reason.contains("model outage")),
            other => panic!("expected failed state, got {other:?}"),
        }
        assert!(!loaded.is_export_ready());
    }

    #[rstest]
    #[tokio::test]
    async fn unresolved_images_do_not_fail_the_run() {
        let store = PresentationStore::new(Arc::new(FixturePresentationRepository::new()));
        let document = store.create(&request()).await.expect("creates");

        let mut search = MockImageSearch::new();
        search.expect_search().returning(|_| Ok(None));

        let pipeline = pipeline_with(FixtureTextGenerator, search, &store);
        pipeline
            .run(document.id, request())
            .await
            .expect("pipeline succeeds without images");

        let loaded = store.get(document.id).await.expect("loads");
        assert_eq!(loaded.state, GenerationState::Ready);
        for slide in &loaded.slides {
            if let Some(slot) = slide.content.image_slot() {
                assert!(slot.resolved.is_none());
            }
        }
    }
}
