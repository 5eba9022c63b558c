//! Reqwest-backed image download adapter for PPTX export.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::domain::ports::{FetchedImage, ImageFetchError, ImageFetcher};

/// Bytes accepted for a single picture. Anything larger is unusable for a
/// slide and would bloat the archive.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Download client implementing [`ImageFetcher`].
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, ImageFetchError> {
        let url = Url::parse(url)
            .map_err(|error| ImageFetchError::unusable(format!("invalid image url: {error}")))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageFetchError::unusable(format!(
                "status {}",
                status.as_u16()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_owned())
            .unwrap_or_default();
        if !content_type.starts_with("image/") {
            return Err(ImageFetchError::unusable(format!(
                "unexpected content type {content_type:?}"
            )));
        }

        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if bytes.is_empty() {
            return Err(ImageFetchError::unusable("empty image body"));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageFetchError::unusable(format!(
                "image body of {} bytes exceeds the embed limit",
                bytes.len()
            )));
        }

        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> ImageFetchError {
    if error.is_timeout() {
        ImageFetchError::timeout(error.to_string())
    } else {
        ImageFetchError::transport(error.to_string())
    }
}
