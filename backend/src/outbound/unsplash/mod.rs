//! Unsplash photo search adapter for slide image enrichment.

mod dto;
mod http_client;

pub use http_client::UnsplashClient;
