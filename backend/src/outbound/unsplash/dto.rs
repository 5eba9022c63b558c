//! Wire types for the Unsplash search API, reduced to the fields we read.

use serde::Deserialize;

use crate::domain::ports::ImageHit;

#[derive(Debug, Deserialize)]
pub(super) struct SearchResponseDto {
    pub results: Vec<PhotoDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PhotoDto {
    pub urls: PhotoUrlsDto,
    #[serde(default)]
    pub alt_description: Option<String>,
    pub user: PhotoUserDto,
    pub links: PhotoLinksDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct PhotoUrlsDto {
    pub regular: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct PhotoUserDto {
    pub name: String,
    pub links: PhotoUserLinksDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct PhotoUserLinksDto {
    pub html: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct PhotoLinksDto {
    pub download_location: String,
}

impl PhotoDto {
    /// Convert to a domain hit; the query stands in for a missing alt text.
    pub fn into_hit(self, query: &str) -> ImageHit {
        let alt = self
            .alt_description
            .filter(|alt| !alt.trim().is_empty())
            .unwrap_or_else(|| query.to_owned());
        ImageHit {
            url: self.urls.regular,
            alt,
            author_name: self.user.name,
            author_url: self.user.links.html,
            download_location: Some(self.links.download_location),
        }
    }
}
