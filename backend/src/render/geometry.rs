//! Slide geometry tables in EMU.
//!
//! All boxes come from a fixed inch grid on a widescreen 16:9 canvas
//! (13.33in by 7.5in). English Metric Units: 914,400 per inch.

use crate::domain::LayoutKind;

/// EMU per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Slide width, 13.33in widescreen.
pub const SLIDE_WIDTH_EMU: i64 = 12_192_000;

/// Slide height, 7.5in.
pub const SLIDE_HEIGHT_EMU: i64 = 6_858_000;

/// An axis-aligned box in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Rect {
    /// Build a box from inch coordinates.
    pub fn from_inches(x: f64, y: f64, cx: f64, cy: f64) -> Self {
        Self {
            x: emu(x),
            y: emu(y),
            cx: emu(cx),
            cy: emu(cy),
        }
    }
}

/// Convert inches to EMU, rounding to the nearest unit.
#[expect(
    clippy::cast_possible_truncation,
    reason = "inch coordinates stay far below the i64 EMU range"
)]
pub fn emu(inches: f64) -> i64 {
    (inches * 914_400.0).round() as i64
}

/// Box placement for one content layout.
#[derive(Debug, Clone, Copy)]
pub struct SlideGeometry {
    pub title: Rect,
    /// Bullet column, or the single text block for text-centric layouts.
    pub body: Rect,
    pub image: Option<Rect>,
    /// Key-insight panel, split layout only.
    pub insight: Option<Rect>,
    /// Decorative accent bar under the title.
    pub accent_bar: Option<Rect>,
}

/// Geometry for a content layout.
pub fn for_layout(layout: LayoutKind) -> SlideGeometry {
    match layout {
        LayoutKind::ImageLeft => SlideGeometry {
            title: Rect::from_inches(0.5, 0.4, 12.33, 1.0),
            body: Rect::from_inches(6.7, 1.4, 6.1, 4.6),
            image: Some(Rect::from_inches(0.4, 1.4, 5.5, 4.2)),
            insight: None,
            accent_bar: None,
        },
        LayoutKind::ImageRight => SlideGeometry {
            title: Rect::from_inches(0.5, 0.4, 12.33, 1.0),
            body: Rect::from_inches(1.0, 1.4, 6.1, 4.6),
            image: Some(Rect::from_inches(7.6, 1.4, 5.5, 4.2)),
            insight: None,
            accent_bar: None,
        },
        LayoutKind::ImageTop => SlideGeometry {
            title: Rect::from_inches(0.5, 0.4, 12.33, 0.9),
            body: Rect::from_inches(2.0, 3.4, 9.33, 3.5),
            image: Some(Rect::from_inches(0.4, 1.3, 12.53, 2.0)),
            insight: None,
            accent_bar: None,
        },
        LayoutKind::SplitContent => SlideGeometry {
            title: Rect::from_inches(0.5, 0.5, 12.33, 1.0),
            body: Rect::from_inches(0.3, 2.0, 3.8, 4.0),
            image: Some(Rect::from_inches(4.5, 2.0, 4.33, 4.0)),
            insight: Some(Rect::from_inches(9.2, 2.0, 3.6, 4.0)),
            accent_bar: Some(Rect::from_inches(6.0, 1.3, 1.33, 0.06)),
        },
        LayoutKind::GridLayout => SlideGeometry {
            title: Rect::from_inches(1.0, 0.5, 11.33, 1.0),
            body: Rect::from_inches(1.0, 2.0, 11.33, 4.5),
            image: None,
            insight: None,
            accent_bar: Some(Rect::from_inches(5.5, 1.6, 2.33, 0.06)),
        },
        LayoutKind::TextOnly => SlideGeometry {
            title: Rect::from_inches(0.5, 0.4, 12.33, 1.0),
            body: Rect::from_inches(2.0, 1.6, 9.33, 4.6),
            image: None,
            insight: None,
            accent_bar: None,
        },
    }
}

/// The four item boxes of the 2x2 grid layout, row-major.
pub fn grid_boxes() -> [Rect; 4] {
    let width = 5.5;
    let height = 2.0;
    [
        Rect::from_inches(1.0, 2.0, width, height),
        Rect::from_inches(6.83, 2.0, width, height),
        Rect::from_inches(1.0, 4.2, width, height),
        Rect::from_inches(6.83, 4.2, width, height),
    ]
}
