//! Port for the external image-search provider.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image search adapters.
    pub enum ImageSearchError {
        /// The provider did not answer within the configured bound.
        Timeout { message: String } =>
            "image search timed out: {message}",
        /// Transport-level failure reaching the provider.
        Transport { message: String } =>
            "image search transport failed: {message}",
        /// The provider rejected the request for quota reasons.
        RateLimited { message: String } =>
            "image search rate limited: {message}",
        /// The provider answered but the payload was unusable.
        Decode { message: String } =>
            "image search response was unusable: {message}",
    }
}

/// Best match returned for a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHit {
    pub url: String,
    pub alt: String,
    pub author_name: String,
    pub author_url: String,
    /// Provider endpoint to ping when the image is actually used.
    pub download_location: Option<String>,
}

/// Port for landscape photo search with attribution.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Return the top hit for a query, or `None` when nothing matched.
    async fn search(&self, query: &str) -> Result<Option<ImageHit>, ImageSearchError>;

    /// Notify the provider that a previously returned hit was used.
    ///
    /// Providers require this for usage accounting; failures are logged and
    /// never propagate into the enrichment result.
    async fn record_download(&self, download_location: &str) -> Result<(), ImageSearchError>;
}

/// Fixture search that never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImageSearch;

#[async_trait]
impl ImageSearch for FixtureImageSearch {
    async fn search(&self, _query: &str) -> Result<Option<ImageHit>, ImageSearchError> {
        Ok(None)
    }

    async fn record_download(&self, _download_location: &str) -> Result<(), ImageSearchError> {
        Ok(())
    }
}
