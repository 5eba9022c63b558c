//! OpenRouter chat-completions adapter for slide text generation.

mod dto;
mod http_client;

pub use http_client::{OpenRouterClient, OpenRouterSettings};
