//! Slide layout catalog.
//!
//! The catalog is a closed set of six layouts. Parsing an unknown name is an
//! error, never a silent default, so stored documents cannot drift onto
//! layouts the renderer does not understand.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The six slide layouts supported by the generator and the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Image on the left, bulleted text on the right.
    ImageLeft,
    /// Image on the right, bulleted text on the left.
    ImageRight,
    /// Full-width image band on top, text below.
    ImageTop,
    /// Three columns: bullets, image, key insight.
    SplitContent,
    /// Two-by-two grid of numbered content boxes.
    GridLayout,
    /// Centred text with no image.
    TextOnly,
}

/// Bullet marker style used when the renderer lays out body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletStyle {
    Numbers,
    Dots,
}

/// Error returned when parsing an unknown layout name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutKindParseError {
    raw: String,
}

impl std::fmt::Display for LayoutKindParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid layout kind: {}", self.raw)
    }
}

impl std::error::Error for LayoutKindParseError {}

impl LayoutKind {
    /// All catalog members in canonical order.
    pub const ALL: [Self; 6] = [
        Self::ImageLeft,
        Self::ImageRight,
        Self::TextOnly,
        Self::SplitContent,
        Self::ImageTop,
        Self::GridLayout,
    ];

    /// Stable wire and storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ImageLeft => "image_left",
            Self::ImageRight => "image_right",
            Self::ImageTop => "image_top",
            Self::SplitContent => "split_content",
            Self::GridLayout => "grid_layout",
            Self::TextOnly => "text_only",
        }
    }

    /// Whether this layout carries an image slot.
    pub fn requires_image(self) -> bool {
        matches!(
            self,
            Self::ImageLeft | Self::ImageRight | Self::ImageTop | Self::SplitContent
        )
    }

    /// Bullet marker used for body text under this layout.
    pub fn bullet_style(self) -> BulletStyle {
        match self {
            Self::ImageLeft | Self::TextOnly | Self::ImageTop => BulletStyle::Numbers,
            Self::ImageRight | Self::SplitContent | Self::GridLayout => BulletStyle::Dots,
        }
    }

    /// Whether body text is centred rather than left aligned.
    pub fn centres_text(self) -> bool {
        matches!(self, Self::TextOnly | Self::ImageTop)
    }
}

impl std::fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LayoutKind {
    type Err = LayoutKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image_left" => Ok(Self::ImageLeft),
            "image_right" => Ok(Self::ImageRight),
            "image_top" => Ok(Self::ImageTop),
            "split_content" => Ok(Self::SplitContent),
            "grid_layout" => Ok(Self::GridLayout),
            "text_only" => Ok(Self::TextOnly),
            other => Err(LayoutKindParseError {
                raw: other.to_owned(),
            }),
        }
    }
}
