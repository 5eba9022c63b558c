//! Reqwest-backed OpenRouter text generation adapter.
//!
//! Owns transport details only: request serialisation, timeout and HTTP
//! error mapping, and extraction of the JSON document the model was asked
//! to produce from its chat reply.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{
    ChatMessageDto, ChatRequestDto, ChatResponseDto, OutlinePayloadDto, SlideBodyPayloadDto,
};
use crate::domain::ports::{
    OutlineRequest, PresentationOutline, SlideBody, SlideBodyRequest, TextGenerationError,
    TextGenerator,
};

const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-lite";
const OUTLINE_TEMPERATURE: f64 = 0.7;
const OUTLINE_MAX_TOKENS: u32 = 2000;
const BODY_TEMPERATURE: f64 = 0.5;
const BODY_MAX_TOKENS: u32 = 1000;

/// Connection settings for the OpenRouter adapter.
pub struct OpenRouterSettings {
    /// API base, e.g. `https://openrouter.ai/api/v1`.
    pub base_url: Url,
    pub api_key: String,
    pub model: String,
}

impl OpenRouterSettings {
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
        }
    }
}

/// Chat-completions client implementing [`TextGenerator`].
pub struct OpenRouterClient {
    client: Client,
    base_url: Url,
    api_key: String,
    model: String,
}

impl OpenRouterClient {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: OpenRouterSettings, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: settings.base_url,
            api_key: settings.api_key,
            model: settings.model,
        })
    }

    async fn chat(
        &self,
        prompt: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, TextGenerationError> {
        let url = self
            .base_url
            .join("chat/completions")
            .map_err(|error| TextGenerationError::transport(error.to_string()))?;
        let body = ChatRequestDto {
            model: &self.model,
            messages: vec![ChatMessageDto {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }

        let decoded: ChatResponseDto = serde_json::from_slice(bytes.as_ref()).map_err(|error| {
            TextGenerationError::decode(format!("invalid chat completion payload: {error}"))
        })?;
        decoded
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| TextGenerationError::decode("chat completion had no choices"))
    }
}

#[async_trait]
impl TextGenerator for OpenRouterClient {
    async fn outline(
        &self,
        request: &OutlineRequest,
    ) -> Result<PresentationOutline, TextGenerationError> {
        let prompt = outline_prompt(request);
        let content = self
            .chat(&prompt, OUTLINE_TEMPERATURE, OUTLINE_MAX_TOKENS)
            .await?;
        let payload: OutlinePayloadDto = parse_embedded_json(&content)?;
        Ok(payload.into_domain())
    }

    async fn slide_body(
        &self,
        request: &SlideBodyRequest,
    ) -> Result<SlideBody, TextGenerationError> {
        let prompt = slide_body_prompt(request);
        let content = self.chat(&prompt, BODY_TEMPERATURE, BODY_MAX_TOKENS).await?;
        let payload: SlideBodyPayloadDto = parse_embedded_json(&content)?;
        Ok(payload.into_domain())
    }
}

fn outline_prompt(request: &OutlineRequest) -> String {
    format!(
        r#"Create the outline for a presentation about "{topic}" with exactly {count} content slides, styled for a {theme} deck.

Requirements:
- Slide titles must be short and informative.
- For each slide provide a relevant English image search query.
- Return strictly JSON, no prose around it.

Return the result in this JSON shape:
{{
  "title": "Presentation title",
  "description": "One-sentence summary of the deck",
  "slides": [
    {{"title": "Slide title", "image_query": "english image search query"}}
  ]
}}"#,
        topic = request.topic,
        count = request.slide_count,
        theme = request.theme,
    )
}

fn slide_body_prompt(request: &SlideBodyRequest) -> String {
    format!(
        r#"Write the body for one slide of a presentation about "{topic}".

Slide title: {title}
Slide arrangement: {layout}

Requirements:
- 3 to 4 concise bullet points.
- One key takeaway sentence in "key_insight".
- Return strictly JSON, no prose around it.

Return the result in this JSON shape:
{{
  "bullets": ["First point", "Second point"],
  "key_insight": "One sentence takeaway"
}}"#,
        topic = request.topic,
        title = request.slide_title,
        layout = request.layout,
    )
}

/// Pull the JSON document out of a chat reply that may wrap it in prose or
/// a code fence: everything from the first opening brace to the last
/// closing brace.
fn parse_embedded_json<T: serde::de::DeserializeOwned>(
    content: &str,
) -> Result<T, TextGenerationError> {
    let start = content
        .find('{')
        .ok_or_else(|| TextGenerationError::decode("reply contained no JSON object"))?;
    let end = content
        .rfind('}')
        .ok_or_else(|| TextGenerationError::decode("reply contained no JSON object"))?;
    if end < start {
        return Err(TextGenerationError::decode("reply contained no JSON object"));
    }
    serde_json::from_str(&content[start..=end])
        .map_err(|error| TextGenerationError::decode(format!("invalid model JSON: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> TextGenerationError {
    if error.is_timeout() {
        TextGenerationError::timeout(error.to_string())
    } else {
        TextGenerationError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TextGenerationError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            TextGenerationError::timeout(message)
        }
        _ => TextGenerationError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
