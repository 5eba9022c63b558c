//! Port for fetching raw image bytes ahead of PPTX embedding.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image fetch adapters.
    pub enum ImageFetchError {
        /// The download did not finish within the configured bound.
        Timeout { message: String } =>
            "image fetch timed out: {message}",
        /// Transport-level failure during the download.
        Transport { message: String } =>
            "image fetch transport failed: {message}",
        /// The host answered with a non-success status or a non-image body.
        Unusable { message: String } =>
            "fetched resource was not a usable image: {message}",
    }
}

/// Downloaded image bytes with their media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    /// e.g. `image/jpeg`; drives the embedded file extension.
    pub content_type: String,
}

impl FetchedImage {
    /// File extension for the embedded media part.
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            _ => "jpeg",
        }
    }
}

/// Port for downloading image bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Download the image at `url`.
    async fn fetch(&self, url: &str) -> Result<FetchedImage, ImageFetchError>;
}

/// Fixture fetcher that always fails, degrading slides to their text fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImageFetcher;

#[async_trait]
impl ImageFetcher for FixtureImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, ImageFetchError> {
        Err(ImageFetchError::transport(format!(
            "fixture fetcher has no network access: {url}"
        )))
    }
}
