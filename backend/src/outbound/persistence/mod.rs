//! PostgreSQL persistence adapters.

mod diesel_presentation_repository;
mod diesel_template_repository;
pub(crate) mod models;
pub mod pool;
pub mod schema;

pub use diesel_presentation_repository::DieselPresentationRepository;
pub use diesel_template_repository::DieselTemplateRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
