//! Domain model and services for presentation generation.
//!
//! The domain is hexagonal: entities and services here depend only on the
//! capability traits in [`ports`]. Outbound adapters implement those traits
//! against Postgres and the upstream HTTP providers; the API layer calls
//! the services and never the adapters directly.

pub mod enricher;
pub mod error;
pub mod export;
pub mod generator;
pub mod layout;
pub mod pipeline;
pub mod ports;
pub mod presentation;
pub mod slide;
pub mod store;
pub mod template;
pub mod theme;

pub use enricher::ImageEnricher;
pub use error::{DomainError, ErrorCode};
pub use export::{ExportService, ExportedDeck};
pub use generator::{ContentGenerator, GeneratedDeck};
pub use layout::{BulletStyle, LayoutKind};
pub use pipeline::GenerationPipeline;
pub use presentation::{
    GenerationState, PresentationDocument, PresentationRequest, PresentationSummary,
    MAX_SLIDE_COUNT, MIN_SLIDE_COUNT,
};
pub use slide::{ImageSlot, ResolvedImage, Slide, SlideContent, GRID_ITEM_LIMIT};
pub use store::{MutationLocks, PresentationStore};
pub use template::{PresentationTemplate, TemplateSlideSpec};
pub use theme::{Palette, Rgb, ThemeKind};
