//! Port for the external language-model provider.
//!
//! Generation is split into one outline call for the deck shape and one body
//! call per slide, so a single bad slide response can be absorbed without
//! discarding the whole deck.

use async_trait::async_trait;

use crate::domain::layout::LayoutKind;
use crate::domain::theme::ThemeKind;

use super::define_port_error;

define_port_error! {
    /// Errors raised by text generation adapters.
    pub enum TextGenerationError {
        /// The provider did not answer within the configured bound.
        Timeout { message: String } =>
            "text generation timed out: {message}",
        /// Transport-level failure reaching the provider.
        Transport { message: String } =>
            "text generation transport failed: {message}",
        /// The provider answered but the payload was unusable.
        Decode { message: String } =>
            "text generation response was unusable: {message}",
    }
}

/// Inputs for the deck outline call.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineRequest {
    pub topic: String,
    pub slide_count: usize,
    pub theme: ThemeKind,
}

/// One slide's place in the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideOutline {
    pub title: String,
    /// English image search query; absent for layouts without an image.
    pub image_query: Option<String>,
}

/// Deck shape returned by the outline call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationOutline {
    pub title: String,
    pub description: String,
    pub slides: Vec<SlideOutline>,
}

/// Inputs for one slide body call.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideBodyRequest {
    pub topic: String,
    pub slide_title: String,
    pub layout: LayoutKind,
    pub theme: ThemeKind,
}

/// Body text returned for one slide.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlideBody {
    pub bullets: Vec<String>,
    pub key_insight: Option<String>,
}

/// Port for structured slide-content generation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce the deck outline: title, description, and per-slide titles.
    async fn outline(
        &self,
        request: &OutlineRequest,
    ) -> Result<PresentationOutline, TextGenerationError>;

    /// Produce one slide's body text.
    async fn slide_body(
        &self,
        request: &SlideBodyRequest,
    ) -> Result<SlideBody, TextGenerationError>;
}

/// Fixture generator producing deterministic placeholder content.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTextGenerator;

#[async_trait]
impl TextGenerator for FixtureTextGenerator {
    async fn outline(
        &self,
        request: &OutlineRequest,
    ) -> Result<PresentationOutline, TextGenerationError> {
        let slides = (1..=request.slide_count)
            .map(|index| SlideOutline {
                title: format!("{} — part {index}", request.topic),
                image_query: Some(request.topic.clone()),
            })
            .collect();
        Ok(PresentationOutline {
            title: request.topic.clone(),
            description: format!("An overview of {}", request.topic),
            slides,
        })
    }

    async fn slide_body(
        &self,
        request: &SlideBodyRequest,
    ) -> Result<SlideBody, TextGenerationError> {
        Ok(SlideBody {
            bullets: vec![format!("About {}", request.slide_title)],
            key_insight: Some(format!("{} matters", request.topic)),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_outline_matches_requested_slide_count() {
        let generator = FixtureTextGenerator;
        let outline = generator
            .outline(&OutlineRequest {
                topic: "Glass recycling".to_owned(),
                slide_count: 4,
                theme: ThemeKind::Dark,
            })
            .await
            .expect("fixture outline succeeds");
        assert_eq!(outline.slides.len(), 4);
        assert_eq!(outline.title, "Glass recycling");
    }

    #[rstest]
    fn timeout_error_formats_message() {
        let err = TextGenerationError::timeout("deadline elapsed");
        assert!(err.to_string().contains("deadline elapsed"));
    }
}
