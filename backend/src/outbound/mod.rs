//! Outbound adapters implementing the domain's capability ports.

pub mod http_image_fetcher;
pub mod openrouter;
pub mod persistence;
pub mod unsplash;

pub use http_image_fetcher::HttpImageFetcher;
pub use openrouter::{OpenRouterClient, OpenRouterSettings};
pub use unsplash::UnsplashClient;
