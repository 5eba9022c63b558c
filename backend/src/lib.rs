//! Backend library modules.

pub mod api;
pub mod config;
pub mod doc;
pub mod domain;
pub mod middleware;
pub mod outbound;
pub mod render;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
