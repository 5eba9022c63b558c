//! Deterministic PPTX rendering.
//!
//! A deck renders to an Office Open XML package with exactly one slide per
//! document slide. Layout geometry and theme palettes are fixed tables, so
//! the same document, image set, and timestamp always produce the same
//! archive.

pub mod geometry;
mod writer;

pub use writer::{PptxRenderer, RenderError};

/// Drawing namespace (`a:`).
pub(crate) const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// Presentation namespace (`p:`).
pub(crate) const NS_PRESENTATION: &str =
    "http://schemas.openxmlformats.org/presentationml/2006/main";

/// Relationship namespace (`r:`).
pub(crate) const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub(crate) const REL_TYPE_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub(crate) const REL_TYPE_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub(crate) const REL_TYPE_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub(crate) const REL_TYPE_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
pub(crate) const REL_TYPE_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
