//! Deck themes and their colour palettes.
//!
//! Each theme maps to a fixed palette the renderer applies verbatim. There is
//! no colour blending at render time.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The five deck themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ThemeKind {
    Minimalist,
    Professional,
    Gradient,
    Dark,
    Creative,
}

/// An RGB colour token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Upper-case hex form used in OOXML (`srgbClr val`).
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Resolved colour palette for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Slide background.
    pub background: Rgb,
    /// Body and title text.
    pub text: Rgb,
    /// Accent bars, numbered badges, key-insight panels.
    pub accent: Rgb,
    /// Secondary accent exposed as the theme's second accent colour.
    pub accent_alt: Rgb,
}

/// Error returned when parsing an unknown theme name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeKindParseError {
    raw: String,
}

impl std::fmt::Display for ThemeKindParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid theme kind: {}", self.raw)
    }
}

impl std::error::Error for ThemeKindParseError {}

const WHITE: Rgb = Rgb(255, 255, 255);
const INK: Rgb = Rgb(17, 24, 39);

impl ThemeKind {
    /// All themes in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Minimalist,
        Self::Professional,
        Self::Gradient,
        Self::Dark,
        Self::Creative,
    ];

    /// Stable wire and storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimalist => "minimalist",
            Self::Professional => "professional",
            Self::Gradient => "gradient",
            Self::Dark => "dark",
            Self::Creative => "creative",
        }
    }

    /// Fixed palette applied by the renderer.
    pub fn palette(self) -> Palette {
        match self {
            Self::Minimalist => Palette {
                background: WHITE,
                text: INK,
                accent: Rgb(99, 102, 241),
                accent_alt: Rgb(147, 51, 234),
            },
            Self::Professional => Palette {
                background: WHITE,
                text: INK,
                accent: Rgb(37, 99, 235),
                accent_alt: Rgb(59, 130, 246),
            },
            Self::Gradient => Palette {
                background: WHITE,
                text: INK,
                accent: Rgb(124, 58, 237),
                accent_alt: Rgb(217, 70, 239),
            },
            Self::Dark => Palette {
                background: Rgb(17, 24, 39),
                text: Rgb(243, 244, 246),
                accent: Rgb(34, 211, 238),
                accent_alt: Rgb(6, 182, 212),
            },
            Self::Creative => Palette {
                background: WHITE,
                text: INK,
                accent: Rgb(236, 72, 153),
                accent_alt: Rgb(147, 51, 234),
            },
        }
    }

    /// Deck-wide font family.
    pub fn font(self) -> &'static str {
        match self {
            Self::Professional => "Georgia",
            _ => "Calibri",
        }
    }
}

impl std::fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThemeKind {
    type Err = ThemeKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimalist" => Ok(Self::Minimalist),
            "professional" => Ok(Self::Professional),
            "gradient" => Ok(Self::Gradient),
            "dark" => Ok(Self::Dark),
            "creative" => Ok(Self::Creative),
            other => Err(ThemeKindParseError {
                raw: other.to_owned(),
            }),
        }
    }
}
