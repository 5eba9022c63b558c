//! Capability ports the domain depends on.
//!
//! Each port is an `async_trait` trait with a mockall test double and a
//! zero-dependency fixture implementation. Outbound adapters live under
//! `crate::outbound`.

mod macros;

pub mod image_fetch;
pub mod image_search;
pub mod presentation_repository;
pub mod template_repository;
pub mod text_generation;

pub(crate) use macros::define_port_error;

pub use image_fetch::{FetchedImage, FixtureImageFetcher, ImageFetchError, ImageFetcher};
pub use image_search::{FixtureImageSearch, ImageHit, ImageSearch, ImageSearchError};
pub use presentation_repository::{
    FixturePresentationRepository, PresentationRepository, PresentationRepositoryError,
};
pub use template_repository::{
    FixtureTemplateRepository, TemplateRepository, TemplateRepositoryError,
};
pub use text_generation::{
    FixtureTextGenerator, OutlineRequest, PresentationOutline, SlideBody, SlideBodyRequest,
    SlideOutline, TextGenerationError, TextGenerator,
};

#[cfg(test)]
pub use image_fetch::MockImageFetcher;
#[cfg(test)]
pub use image_search::MockImageSearch;
#[cfg(test)]
pub use presentation_repository::MockPresentationRepository;
#[cfg(test)]
pub use template_repository::MockTemplateRepository;
#[cfg(test)]
pub use text_generation::MockTextGenerator;
