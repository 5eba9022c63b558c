//! Image enrichment: resolving slide image queries against the search port.
//!
//! Every lookup is bounded by a per-query timeout. Timeouts get one retry;
//! any remaining failure, an empty result included, leaves the slot
//! unresolved. An unresolved slot is the deterministic fallback: the slide
//! renders without an image. Re-running enrichment may therefore resolve
//! different images; that nondeterminism is accepted.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::ports::{ImageSearch, ImageSearchError};
use super::slide::{ResolvedImage, Slide};

/// Default per-query bound; mirrors the config default.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Service resolving image slots through an [`ImageSearch`] port.
pub struct ImageEnricher<S>
where
    S: ImageSearch + ?Sized + 'static,
{
    search: Arc<S>,
    query_timeout: Duration,
}

impl<S> ImageEnricher<S>
where
    S: ImageSearch + ?Sized + 'static,
{
    pub fn new(search: Arc<S>, query_timeout: Duration) -> Self {
        Self {
            search,
            query_timeout,
        }
    }

    /// Resolve one query. `None` means no image; the caller keeps the slot
    /// unresolved and the slide falls back to text.
    pub async fn resolve(&self, query: &str) -> Option<ResolvedImage> {
        let hit = match self.search_with_retry(query).await {
            Ok(Some(hit)) => hit,
            Ok(None) => {
                debug!(query, "image search returned no results");
                return None;
            }
            Err(error) => {
                warn!(query, %error, "image search failed, slide falls back to text");
                return None;
            }
        };

        if let Some(location) = hit.download_location.clone() {
            // Usage ping required by the provider terms; fire and forget.
            let search = Arc::clone(&self.search);
            tokio::spawn(async move {
                if let Err(error) = search.record_download(&location).await {
                    debug!(%error, "download notification failed");
                }
            });
        }

        Some(ResolvedImage {
            url: hit.url,
            alt: hit.alt,
            author_name: hit.author_name,
            author_url: hit.author_url,
        })
    }

    /// Resolve every unresolved image slot in `slides`.
    pub async fn enrich_slides(&self, slides: &mut [Slide]) {
        for slide in slides {
            let query = match slide.content.image_slot() {
                Some(slot) if slot.resolved.is_none() => slot.query.clone(),
                _ => continue,
            };
            let resolved = self.resolve(&query).await;
            if let Some(slot) = slide.content.image_slot_mut() {
                slot.resolved = resolved;
            }
        }
    }

    async fn search_with_retry(
        &self,
        query: &str,
    ) -> Result<Option<super::ports::ImageHit>, ImageSearchError> {
        match self.search_once(query).await {
            Err(ImageSearchError::Timeout { message }) => {
                debug!(query, message, "image search timed out, retrying once");
                self.search_once(query).await
            }
            other => other,
        }
    }

    async fn search_once(
        &self,
        query: &str,
    ) -> Result<Option<super::ports::ImageHit>, ImageSearchError> {
        match tokio::time::timeout(self.query_timeout, self.search.search(query)).await {
            Ok(result) => result,
            Err(_) => Err(ImageSearchError::timeout(format!(
                "no answer within {:?}",
                self.query_timeout
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{ImageHit, MockImageSearch};
    use crate::domain::slide::{ImageSlot, SlideContent};

    fn hit() -> ImageHit {
        ImageHit {
            url: "https://images.example/bee.jpg".to_owned(),
            alt: "A bee on a flower".to_owned(),
            author_name: "Sam Photographer".to_owned(),
            author_url: "https://photos.example/@sam".to_owned(),
            download_location: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn resolves_the_top_hit_with_attribution() {
        let mut search = MockImageSearch::new();
        search
            .expect_search()
            .times(1)
            .returning(|_| Ok(Some(hit())));
        let enricher = ImageEnricher::new(Arc::new(search), DEFAULT_QUERY_TIMEOUT);

        let resolved = enricher.resolve("bees").await.expect("hit resolves");
        assert_eq!(resolved.author_name, "Sam Photographer");
        assert_eq!(resolved.url, "https://images.example/bee.jpg");
    }

    #[rstest]
    #[tokio::test]
    async fn empty_results_and_failures_leave_the_slot_unresolved() {
        let mut search = MockImageSearch::new();
        search.expect_search().times(1).returning(|_| Ok(None));
        search
            .expect_search()
            .times(1)
            .returning(|_| Err(ImageSearchError::transport("dns failure")));
        let enricher = ImageEnricher::new(Arc::new(search), DEFAULT_QUERY_TIMEOUT);

        assert!(enricher.resolve("first").await.is_none());
        assert!(enricher.resolve("second").await.is_none());
    }

    /// Search double that sleeps past the timeout for its first `slow_calls`
    /// invocations, then answers with a hit.
    struct SlowThenHitSearch {
        slow_calls: u32,
        calls: std::sync::atomic::AtomicU32,
    }

    impl SlowThenHitSearch {
        fn new(slow_calls: u32) -> Self {
            Self {
                slow_calls,
                calls: std::sync::atomic::AtomicU32::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl ImageSearch for SlowThenHitSearch {
        async fn search(
            &self,
            _query: &str,
        ) -> Result<Option<ImageHit>, ImageSearchError> {
            let call = self
                .calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if call < self.slow_calls {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            Ok(Some(hit()))
        }

        async fn record_download(
            &self,
            _download_location: &str,
        ) -> Result<(), ImageSearchError> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn a_slow_provider_times_out_and_gets_one_retry() {
        let search = Arc::new(SlowThenHitSearch::new(2));
        let enricher = ImageEnricher::new(Arc::clone(&search), Duration::from_secs(5));

        assert!(enricher.resolve("glaciers").await.is_none());
        assert_eq!(search.calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn a_timeout_then_a_hit_still_resolves() {
        let search = Arc::new(SlowThenHitSearch::new(1));
        let enricher = ImageEnricher::new(Arc::clone(&search), Duration::from_secs(5));

        assert!(enricher.resolve("glaciers").await.is_some());
        assert_eq!(search.calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn enrich_slides_skips_slots_that_are_already_resolved() {
        let mut search = MockImageSearch::new();
        search
            .expect_search()
            .times(1)
            .returning(|_| Ok(Some(hit())));
        let enricher = ImageEnricher::new(Arc::new(search), DEFAULT_QUERY_TIMEOUT);

        let mut slides = vec![
            Slide::new(SlideContent::ImageLeft {
                title: "Needs image".to_owned(),
                bullets: vec!["a".to_owned()],
                image: ImageSlot::pending("bees"),
            })
            .expect("valid"),
            Slide::new(SlideContent::ImageRight {
                title: "Already resolved".to_owned(),
                bullets: vec!["b".to_owned()],
                image: ImageSlot {
                    query: "kept".to_owned(),
                    resolved: Some(ResolvedImage {
                        url: "https://images.example/kept.jpg".to_owned(),
                        alt: "kept".to_owned(),
                        author_name: "Kept".to_owned(),
                        author_url: "https://photos.example/@kept".to_owned(),
                    }),
                },
            })
            .expect("valid"),
            Slide::new(SlideContent::TextOnly {
                title: "No slot".to_owned(),
                bullets: vec!["c".to_owned()],
                key_insight: None,
            })
            .expect("valid"),
        ];

        enricher.enrich_slides(&mut slides).await;

        let first = slides[0].content.image_slot().expect("slot");
        assert!(first.resolved.is_some());
        let second = slides[1].content.image_slot().expect("slot");
        assert_eq!(
            second.resolved.as_ref().expect("kept").url,
            "https://images.example/kept.jpg"
        );
    }
}
