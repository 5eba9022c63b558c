//! Slide entities and per-layout content payloads.
//!
//! `SlideContent` is a tagged union over the layout catalog: the `layout`
//! tag selects the variant, and each variant carries exactly the fields its
//! layout renders. Validation happens at this boundary so the store and the
//! renderer can rely on well-formed content.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::DomainError;
use super::layout::LayoutKind;

/// Maximum number of boxes a grid slide can hold.
pub const GRID_ITEM_LIMIT: usize = 4;

/// An image resolved from the image-search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImage {
    /// Direct image URL.
    pub url: String,
    /// Alt text taken from the provider description.
    pub alt: String,
    /// Photographer name, kept for attribution.
    pub author_name: String,
    /// Photographer profile URL.
    pub author_url: String,
}

/// An image slot on an image-bearing layout.
///
/// The slot always keeps its search query; `resolved` stays `None` when the
/// provider timed out, failed, or returned nothing. Rendering treats an
/// unresolved slot as the slide's text-only fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageSlot {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<ResolvedImage>,
}

impl ImageSlot {
    /// Slot with a query and no resolved image yet.
    pub fn pending(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            resolved: None,
        }
    }
}

/// Per-layout slide content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum SlideContent {
    ImageLeft {
        title: String,
        bullets: Vec<String>,
        image: ImageSlot,
    },
    ImageRight {
        title: String,
        bullets: Vec<String>,
        image: ImageSlot,
    },
    ImageTop {
        title: String,
        bullets: Vec<String>,
        image: ImageSlot,
    },
    SplitContent {
        title: String,
        bullets: Vec<String>,
        key_insight: String,
        image: ImageSlot,
    },
    GridLayout {
        title: String,
        items: Vec<String>,
    },
    TextOnly {
        title: String,
        bullets: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        key_insight: Option<String>,
    },
}

impl SlideContent {
    /// Layout this content belongs to.
    pub fn layout(&self) -> LayoutKind {
        match self {
            Self::ImageLeft { .. } => LayoutKind::ImageLeft,
            Self::ImageRight { .. } => LayoutKind::ImageRight,
            Self::ImageTop { .. } => LayoutKind::ImageTop,
            Self::SplitContent { .. } => LayoutKind::SplitContent,
            Self::GridLayout { .. } => LayoutKind::GridLayout,
            Self::TextOnly { .. } => LayoutKind::TextOnly,
        }
    }

    /// Slide title.
    pub fn title(&self) -> &str {
        match self {
            Self::ImageLeft { title, .. }
            | Self::ImageRight { title, .. }
            | Self::ImageTop { title, .. }
            | Self::SplitContent { title, .. }
            | Self::GridLayout { title, .. }
            | Self::TextOnly { title, .. } => title,
        }
    }

    /// Image slot, when the layout carries one.
    pub fn image_slot(&self) -> Option<&ImageSlot> {
        match self {
            Self::ImageLeft { image, .. }
            | Self::ImageRight { image, .. }
            | Self::ImageTop { image, .. }
            | Self::SplitContent { image, .. } => Some(image),
            Self::GridLayout { .. } | Self::TextOnly { .. } => None,
        }
    }

    /// Mutable image slot, when the layout carries one.
    pub fn image_slot_mut(&mut self) -> Option<&mut ImageSlot> {
        match self {
            Self::ImageLeft { image, .. }
            | Self::ImageRight { image, .. }
            | Self::ImageTop { image, .. }
            | Self::SplitContent { image, .. } => Some(image),
            Self::GridLayout { .. } | Self::TextOnly { .. } => None,
        }
    }

    /// Bulleted body text, empty for grid slides.
    pub fn bullets(&self) -> &[String] {
        match self {
            Self::ImageLeft { bullets, .. }
            | Self::ImageRight { bullets, .. }
            | Self::ImageTop { bullets, .. }
            | Self::SplitContent { bullets, .. }
            | Self::TextOnly { bullets, .. } => bullets,
            Self::GridLayout { .. } => &[],
        }
    }

    /// Validate the variant's required-field set.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` when a required field is blank or out of
    /// range for the layout.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title().trim().is_empty() {
            return Err(DomainError::invalid_request("slide title must not be empty"));
        }
        match self {
            Self::ImageLeft { bullets, image, .. }
            | Self::ImageRight { bullets, image, .. }
            | Self::ImageTop { bullets, image, .. } => {
                require_bullets(bullets)?;
                require_query(image)
            }
            Self::SplitContent {
                bullets,
                key_insight,
                image,
                ..
            } => {
                require_bullets(bullets)?;
                if key_insight.trim().is_empty() {
                    return Err(DomainError::invalid_request(
                        "split_content slides require a key insight",
                    ));
                }
                require_query(image)
            }
            Self::GridLayout { items, .. } => {
                if items.is_empty() || items.len() > GRID_ITEM_LIMIT {
                    return Err(DomainError::invalid_request(format!(
                        "grid_layout slides hold 1 to {GRID_ITEM_LIMIT} items"
                    )));
                }
                if items.iter().any(|item| item.trim().is_empty()) {
                    return Err(DomainError::invalid_request(
                        "grid_layout items must not be empty",
                    ));
                }
                Ok(())
            }
            Self::TextOnly { bullets, .. } => require_bullets(bullets),
        }
    }
}

fn require_bullets(bullets: &[String]) -> Result<(), DomainError> {
    if bullets.is_empty() {
        return Err(DomainError::invalid_request(
            "slide body requires at least one bullet",
        ));
    }
    if bullets.iter().any(|bullet| bullet.trim().is_empty()) {
        return Err(DomainError::invalid_request("bullets must not be empty"));
    }
    Ok(())
}

fn require_query(image: &ImageSlot) -> Result<(), DomainError> {
    if image.query.trim().is_empty() {
        return Err(DomainError::invalid_request(
            "image slots require a search query",
        ));
    }
    Ok(())
}

/// A slide: a stable identity plus its content payload.
///
/// Position within the deck is given by document order, not by the slide
/// itself, so reordering never rewrites slide ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: Uuid,
    #[serde(flatten)]
    pub content: SlideContent,
}

impl Slide {
    /// Create a slide with a fresh id, validating its content.
    ///
    /// # Errors
    ///
    /// Propagates content validation failures.
    pub fn new(content: SlideContent) -> Result<Self, DomainError> {
        content.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            content,
        })
    }
}
