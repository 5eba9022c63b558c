//! Content generation: turning a topic into a validated slide deck.
//!
//! One outline call fixes the deck shape; one body call per slide fills it.
//! Outline failure is pipeline-fatal. A failed body call degrades to a
//! placeholder slide so a single bad response never discards the deck.
//! Timeouts get one retry before either outcome.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use super::error::DomainError;
use super::layout::LayoutKind;
use super::ports::{
    OutlineRequest, SlideBody, SlideBodyRequest, SlideOutline, TextGenerationError, TextGenerator,
};
use super::presentation::PresentationRequest;
use super::slide::{ImageSlot, Slide, SlideContent, GRID_ITEM_LIMIT};

/// A fully generated deck, ready to install on the document.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDeck {
    pub title: String,
    pub description: String,
    pub slides: Vec<Slide>,
    pub layout_order: Vec<LayoutKind>,
}

/// Service producing deck content through a [`TextGenerator`] port.
pub struct ContentGenerator<T>
where
    T: TextGenerator + ?Sized,
{
    generator: Arc<T>,
}

impl<T> ContentGenerator<T>
where
    T: TextGenerator + ?Sized,
{
    pub fn new(generator: Arc<T>) -> Self {
        Self { generator }
    }

    /// Generate a deck for a validated request.
    ///
    /// # Errors
    ///
    /// Returns `upstream_timeout` or `upstream_failure` when the outline call
    /// cannot be completed; these are pipeline-fatal.
    pub async fn generate(
        &self,
        request: &PresentationRequest,
        rng: &mut impl Rng,
    ) -> Result<GeneratedDeck, DomainError> {
        let layout_order = match &request.layout_mix {
            Some(mix) => mix.clone(),
            None => draw_layout_order(request.slide_count, rng),
        };

        let outline_request = OutlineRequest {
            topic: request.topic.clone(),
            slide_count: request.slide_count,
            theme: request.theme,
        };
        let mut outline = self
            .outline_with_retry(&outline_request)
            .await
            .map_err(outline_error)?;
        align_outline(&mut outline.slides, &request.topic, request.slide_count);

        let mut slides = Vec::with_capacity(request.slide_count);
        for (slide_outline, layout) in outline.slides.iter().zip(&layout_order) {
            let body = self
                .body_with_retry(&SlideBodyRequest {
                    topic: request.topic.clone(),
                    slide_title: slide_outline.title.clone(),
                    layout: *layout,
                    theme: request.theme,
                })
                .await
                .unwrap_or_else(|error| {
                    warn!(
                        slide_title = %slide_outline.title,
                        %error,
                        "slide body generation failed, using placeholder"
                    );
                    SlideBody::default()
                });
            slides.push(build_slide(*layout, slide_outline, body, &request.topic)?);
        }

        Ok(GeneratedDeck {
            title: nonempty_or(outline.title, &request.topic),
            description: outline.description,
            slides,
            layout_order,
        })
    }

    async fn outline_with_retry(
        &self,
        request: &OutlineRequest,
    ) -> Result<super::ports::PresentationOutline, TextGenerationError> {
        match self.generator.outline(request).await {
            Err(TextGenerationError::Timeout { message }) => {
                debug!(message, "outline call timed out, retrying once");
                self.generator.outline(request).await
            }
            other => other,
        }
    }

    async fn body_with_retry(
        &self,
        request: &SlideBodyRequest,
    ) -> Result<SlideBody, TextGenerationError> {
        match self.generator.slide_body(request).await {
            Err(TextGenerationError::Timeout { message }) => {
                debug!(message, "slide body call timed out, retrying once");
                self.generator.slide_body(request).await
            }
            other => other,
        }
    }
}

/// Draw the layout order for a deck: a random permutation of the six kinds,
/// drawn exactly once, cycled to cover every slide.
pub fn draw_layout_order(slide_count: usize, rng: &mut impl Rng) -> Vec<LayoutKind> {
    let mut permutation = LayoutKind::ALL;
    permutation.shuffle(rng);
    permutation.iter().copied().cycle().take(slide_count).collect()
}

fn outline_error(error: TextGenerationError) -> DomainError {
    match error {
        TextGenerationError::Timeout { message } => DomainError::upstream_timeout(message),
        TextGenerationError::Transport { message } | TextGenerationError::Decode { message } => {
            DomainError::upstream_failure(message)
        }
    }
}

/// Pad or truncate the outline so it covers exactly `slide_count` slides.
fn align_outline(slides: &mut Vec<SlideOutline>, topic: &str, slide_count: usize) {
    slides.truncate(slide_count);
    let mut index = slides.len();
    while slides.len() < slide_count {
        index += 1;
        slides.push(SlideOutline {
            title: format!("{topic} ({index})"),
            image_query: None,
        });
    }
}

fn build_slide(
    layout: LayoutKind,
    outline: &SlideOutline,
    body: SlideBody,
    topic: &str,
) -> Result<Slide, DomainError> {
    let title = nonempty_or(outline.title.clone(), topic);
    let bullets = if body.bullets.is_empty() {
        // Placeholder body keeps the deck renderable after a failed call.
        vec![format!("Content for \"{title}\" is unavailable")]
    } else {
        body.bullets
    };
    let image_query = outline
        .image_query
        .clone()
        .filter(|query| !query.trim().is_empty())
        .unwrap_or_else(|| title.clone());
    let image = || ImageSlot::pending(image_query.clone());

    let content = match layout {
        LayoutKind::ImageLeft => SlideContent::ImageLeft {
            title,
            bullets,
            image: image(),
        },
        LayoutKind::ImageRight => SlideContent::ImageRight {
            title,
            bullets,
            image: image(),
        },
        LayoutKind::ImageTop => SlideContent::ImageTop {
            title,
            bullets,
            image: image(),
        },
        LayoutKind::SplitContent => SlideContent::SplitContent {
            key_insight: body
                .key_insight
                .filter(|insight| !insight.trim().is_empty())
                .unwrap_or_else(|| format!("{topic} in one sentence")),
            title,
            bullets,
            image: image(),
        },
        LayoutKind::GridLayout => SlideContent::GridLayout {
            title,
            items: bullets.into_iter().take(GRID_ITEM_LIMIT).collect(),
        },
        LayoutKind::TextOnly => SlideContent::TextOnly {
            title,
            bullets,
            key_insight: body.key_insight.filter(|insight| !insight.trim().is_empty()),
        },
    };
    Slide::new(content)
}

fn nonempty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_owned()
    } else {
        value
    }
}
