//! PPTX export orchestration.
//!
//! Export is read-mostly: it loads the document, downloads the resolved
//! images, renders the deck, and records the export URL on the document.
//! Image downloads are best-effort; a slide whose bytes cannot be fetched
//! renders without its picture. Rendering itself is deterministic for a
//! given document, image set, and timestamp.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures_util::future::join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::render::PptxRenderer;

use super::error::DomainError;
use super::ports::{FetchedImage, ImageFetcher, PresentationRepository};
use super::presentation::PresentationDocument;
use super::store::PresentationStore;

/// A rendered deck plus the filename to serve it under.
#[derive(Debug)]
pub struct ExportedDeck {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Export service over the store and an [`ImageFetcher`] port.
pub struct ExportService<R, F>
where
    R: PresentationRepository + ?Sized + 'static,
    F: ImageFetcher + ?Sized + 'static,
{
    store: PresentationStore<R>,
    fetcher: Arc<F>,
}

impl<R, F> ExportService<R, F>
where
    R: PresentationRepository + ?Sized + 'static,
    F: ImageFetcher + ?Sized + 'static,
{
    pub fn new(store: PresentationStore<R>, fetcher: Arc<F>) -> Self {
        Self { store, fetcher }
    }

    /// Export one presentation as a PPTX archive.
    ///
    /// # Errors
    ///
    /// Returns `not_found` for an unknown id, `not_ready` while generation
    /// is in flight or has failed, and `render_failure` when the archive
    /// cannot be written.
    pub async fn export_pptx(&self, id: Uuid) -> Result<ExportedDeck, DomainError> {
        let document = self.store.get(id).await?;
        if !document.is_export_ready() {
            return Err(DomainError::not_ready(format!(
                "presentation {id} has no completed slides to export"
            )));
        }

        let images = self.fetch_images(&document).await;
        let bytes = PptxRenderer::new()
            .render(&document, &images, Utc::now())
            .map_err(|error| DomainError::render_failure(error.to_string()))?;

        let url = format!("/api/presentations/{id}/export/pptx");
        self.store.record_export(id, &url).await?;
        info!(
            presentation_id = %id,
            bytes = bytes.len(),
            images = images.len(),
            "presentation exported"
        );

        Ok(ExportedDeck {
            bytes,
            filename: export_filename(&document.title),
        })
    }

    /// Download every resolved slide image, concurrently and best-effort.
    async fn fetch_images(&self, document: &PresentationDocument) -> HashMap<Uuid, FetchedImage> {
        let targets: Vec<(Uuid, String)> = document
            .slides
            .iter()
            .filter_map(|slide| {
                let resolved = slide.content.image_slot()?.resolved.as_ref()?;
                Some((slide.id, resolved.url.clone()))
            })
            .collect();

        let downloads = targets.iter().map(|(slide_id, url)| {
            let fetcher = Arc::clone(&self.fetcher);
            async move {
                match fetcher.fetch(url).await {
                    Ok(image) => Some((*slide_id, image)),
                    Err(error) => {
                        warn!(%slide_id, url, %error, "image download failed, rendering without it");
                        None
                    }
                }
            }
        });

        join_all(downloads).await.into_iter().flatten().collect()
    }
}

/// Derive a download filename from the deck title.
fn export_filename(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "presentation.pptx".to_owned()
    } else {
        format!("{stem}.pptx")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::layout::LayoutKind;
    use crate::domain::ports::{
        FixturePresentationRepository, ImageFetchError, MockImageFetcher,
    };
    use crate::domain::presentation::PresentationRequest;
    use crate::domain::slide::{ImageSlot, ResolvedImage, Slide, SlideContent};
    use crate::domain::theme::ThemeKind;
    use crate::domain::ErrorCode;

    fn request() -> PresentationRequest {
        PresentationRequest {
            topic: "Volcanoes".to_owned(),
            slide_count: 3,
            theme: ThemeKind::Professional,
            layout_mix: None,
            template_id: None,
        }
    }

    fn resolved_slot(url: &str) -> ImageSlot {
        ImageSlot {
            query: "volcano".to_owned(),
            resolved: Some(ResolvedImage {
                url: url.to_owned(),
                alt: "A volcano".to_owned(),
                author_name: "Eli".to_owned(),
                author_url: "https://photos.example/@eli".to_owned(),
            }),
        }
    }

    async fn ready_store() -> (
        PresentationStore<FixturePresentationRepository>,
        PresentationDocument,
    ) {
        let store = PresentationStore::new(Arc::new(FixturePresentationRepository::new()));
        let mut document = store.create(&request()).await.expect("creates");
        document.begin_generation().expect("starts");
        let slides = vec![
            Slide::new(SlideContent::ImageLeft {
                title: "Formation".to_owned(),
                bullets: vec!["Magma rises".to_owned()],
                image: resolved_slot("https://images.example/volcano.jpg"),
            })
            .expect("valid"),
            Slide::new(SlideContent::TextOnly {
                title: "Eruption types".to_owned(),
                bullets: vec!["Effusive".to_owned(), "Explosive".to_owned()],
                key_insight: None,
            })
            .expect("valid"),
            Slide::new(SlideContent::TextOnly {
                title: "Monitoring".to_owned(),
                bullets: vec!["Seismographs".to_owned()],
                key_insight: None,
            })
            .expect("valid"),
        ];
        document
            .complete_generation(
                "Volcanoes".to_owned(),
                "How volcanoes work".to_owned(),
                slides,
                vec![LayoutKind::ImageLeft, LayoutKind::TextOnly, LayoutKind::TextOnly],
            )
            .expect("completes");
        store
            .repository()
            .save(&document)
            .await
            .expect("saves ready state");
        (store, document)
    }

    #[rstest]
    #[tokio::test]
    async fn exports_a_ready_presentation_and_records_the_url() {
        let (store, document) = ready_store().await;
        let mut fetcher = MockImageFetcher::new();
        fetcher.expect_fetch().times(1).returning(|_| {
            Ok(FetchedImage {
                bytes: vec![0x89, 0x50, 0x4E, 0x47],
                content_type: "image/png".to_owned(),
            })
        });

        let service = ExportService::new(store.clone(), Arc::new(fetcher));
        let exported = service.export_pptx(document.id).await.expect("exports");

        assert!(!exported.bytes.is_empty());
        assert_eq!(exported.filename, "Volcanoes.pptx");
        let loaded = store.get(document.id).await.expect("loads");
        assert_eq!(
            loaded.presentation_url.as_deref(),
            Some(format!("/api/presentations/{}/export/pptx", document.id).as_str())
        );
    }

    #[rstest]
    #[tokio::test]
    async fn a_failed_image_download_does_not_fail_the_export() {
        let (store, document) = ready_store().await;
        let mut fetcher = MockImageFetcher::new();
        fetcher
            .expect_fetch()
            .times(1)
            .returning(|_| Err(ImageFetchError::transport("connection reset")));

        let service = ExportService::new(store, Arc::new(fetcher));
        let exported = service.export_pptx(document.id).await.expect("exports");
        assert!(!exported.bytes.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn a_pending_presentation_is_not_exportable() {
        let store = PresentationStore::new(Arc::new(FixturePresentationRepository::new()));
        let document = store.create(&request()).await.expect("creates");
        let mut fetcher = MockImageFetcher::new();
        fetcher.expect_fetch().never();

        let service = ExportService::new(store, Arc::new(fetcher));
        let err = service
            .export_pptx(document.id)
            .await
            .expect_err("pending rejects export");
        assert_eq!(err.code(), ErrorCode::NotReady);
    }

    #[rstest]
    #[case("Volcanoes", "Volcanoes.pptx")]
    #[case("Deep sea: an intro!", "Deep_sea__an_intro.pptx")]
    #[case("***", "presentation.pptx")]
    fn filenames_are_ascii_safe(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(export_filename(title), expected);
    }
}
