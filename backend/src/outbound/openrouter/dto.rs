//! Wire types for the OpenRouter chat-completions API and the JSON
//! payloads the model is asked to emit.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{PresentationOutline, SlideBody, SlideOutline};

/// Chat-completions request body.
#[derive(Debug, Serialize)]
pub(super) struct ChatRequestDto<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessageDto<'a>>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatMessageDto<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Chat-completions response body, reduced to the fields we read.
#[derive(Debug, Deserialize)]
pub(super) struct ChatResponseDto {
    pub choices: Vec<ChatChoiceDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatChoiceDto {
    pub message: ChatChoiceMessageDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatChoiceMessageDto {
    pub content: String,
}

/// Deck outline as the model is instructed to format it.
#[derive(Debug, Deserialize)]
pub(super) struct OutlinePayloadDto {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub slides: Vec<OutlineSlideDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OutlineSlideDto {
    pub title: String,
    #[serde(default)]
    pub image_query: Option<String>,
}

impl OutlinePayloadDto {
    pub fn into_domain(self) -> PresentationOutline {
        PresentationOutline {
            title: self.title,
            description: self.description,
            slides: self
                .slides
                .into_iter()
                .map(|slide| SlideOutline {
                    title: slide.title,
                    image_query: slide.image_query.filter(|q| !q.trim().is_empty()),
                })
                .collect(),
        }
    }
}

/// Per-slide body as the model is instructed to format it.
#[derive(Debug, Deserialize)]
pub(super) struct SlideBodyPayloadDto {
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub key_insight: Option<String>,
}

impl SlideBodyPayloadDto {
    pub fn into_domain(self) -> SlideBody {
        SlideBody {
            bullets: self
                .bullets
                .into_iter()
                .map(|b| b.trim().to_owned())
                .filter(|b| !b.is_empty())
                .collect(),
            key_insight: self
                .key_insight
                .map(|k| k.trim().to_owned())
                .filter(|k| !k.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn outline_payload_drops_blank_image_queries() {
        let payload: OutlinePayloadDto = serde_json::from_str(
            r#"{
                "title": "Bees",
                "slides": [
                    {"title": "Anatomy", "image_query": "honeybee macro"},
                    {"title": "Hives", "image_query": "  "},
                    {"title": "Summary"}
                ]
            }"#,
        )
        .expect("valid payload");

        let outline = payload.into_domain();
        assert_eq!(outline.description, "");
        assert_eq!(
            outline.slides[0].image_query.as_deref(),
            Some("honeybee macro")
        );
        assert_eq!(outline.slides[1].image_query, None);
        assert_eq!(outline.slides[2].image_query, None);
    }

    #[rstest]
    fn slide_body_payload_trims_and_drops_empty_bullets() {
        let payload: SlideBodyPayloadDto = serde_json::from_str(
            r#"{"bullets": [" one ", "", "two"], "key_insight": " "}"#,
        )
        .expect("valid payload");

        let body = payload.into_domain();
        assert_eq!(body.bullets, vec!["one".to_owned(), "two".to_owned()]);
        assert_eq!(body.key_insight, None);
    }
}
