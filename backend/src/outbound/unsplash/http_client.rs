//! Reqwest-backed Unsplash search adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::SearchResponseDto;
use crate::domain::ports::{ImageHit, ImageSearch, ImageSearchError};

/// Search client implementing [`ImageSearch`].
pub struct UnsplashClient {
    client: Client,
    base_url: Url,
    access_key: String,
}

impl UnsplashClient {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        access_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            access_key: access_key.into(),
        })
    }

    fn auth_value(&self) -> String {
        format!("Client-ID {}", self.access_key)
    }
}

#[async_trait]
impl ImageSearch for UnsplashClient {
    async fn search(&self, query: &str) -> Result<Option<ImageHit>, ImageSearchError> {
        let url = self
            .base_url
            .join("search/photos")
            .map_err(|error| ImageSearchError::transport(error.to_string()))?;
        let response = self
            .client
            .get(url)
            .query(&[
                ("query", query),
                ("per_page", "1"),
                ("orientation", "landscape"),
                ("content_filter", "high"),
            ])
            .header(reqwest::header::AUTHORIZATION, self.auth_value())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }

        let decoded: SearchResponseDto = serde_json::from_slice(bytes.as_ref()).map_err(|error| {
            ImageSearchError::decode(format!("invalid search payload: {error}"))
        })?;
        Ok(decoded
            .results
            .into_iter()
            .next()
            .map(|photo| photo.into_hit(query)))
    }

    /// Usage ping required by the Unsplash API guidelines.
    async fn record_download(&self, download_location: &str) -> Result<(), ImageSearchError> {
        let url = Url::parse(download_location)
            .map_err(|error| ImageSearchError::transport(error.to_string()))?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.auth_value())
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let bytes = response.bytes().await.unwrap_or_default();
            return Err(map_status_error(status, bytes.as_ref()));
        }
        Ok(())
    }
}

fn map_transport_error(error: reqwest::Error) -> ImageSearchError {
    if error.is_timeout() {
        ImageSearchError::timeout(error.to_string())
    } else {
        ImageSearchError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ImageSearchError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };
    match status {
        StatusCode::TOO_MANY_REQUESTS => ImageSearchError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ImageSearchError::timeout(message)
        }
        _ => ImageSearchError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
