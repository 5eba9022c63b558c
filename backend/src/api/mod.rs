//! REST API modules.

pub mod error;
pub mod health;
pub mod images;
pub mod presentations;

use crate::domain::ports::{ImageFetcher, ImageSearch, PresentationRepository, TextGenerator};
use crate::domain::{ExportService, GenerationPipeline, ImageEnricher, PresentationStore};

pub use error::{ApiError, ApiResult};

/// Store alias handlers receive through `web::Data`.
pub type SharedPresentationStore = PresentationStore<dyn PresentationRepository>;

/// Pipeline alias handlers receive through `web::Data`.
pub type SharedGenerationPipeline =
    GenerationPipeline<dyn TextGenerator, dyn ImageSearch, dyn PresentationRepository>;

/// Export service alias handlers receive through `web::Data`.
pub type SharedExportService = ExportService<dyn PresentationRepository, dyn ImageFetcher>;

/// Enricher alias handlers receive through `web::Data`.
pub type SharedImageEnricher = ImageEnricher<dyn ImageSearch>;
