//! Presentation document aggregate and its generation state machine.
//!
//! ## Invariants
//! - `layout_order`, when present, assigns one layout per slide drawn once at
//!   generation time; it is never re-shuffled afterwards.
//! - `presentation_url` is only present after a completed export and is
//!   cleared by any content-mutating edit.
//! - State transitions are `Pending -> Generating -> { Ready, Failed }`;
//!   nothing else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::DomainError;
use super::layout::LayoutKind;
use super::slide::{Slide, SlideContent};
use super::theme::ThemeKind;

/// Bounds on the requested slide count.
pub const MIN_SLIDE_COUNT: usize = 3;
pub const MAX_SLIDE_COUNT: usize = 20;

/// Lifecycle of a presentation's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GenerationState {
    /// Accepted, generation not started yet.
    Pending,
    /// The generation pipeline is running.
    Generating,
    /// Content is complete and exportable.
    Ready,
    /// The pipeline failed; the document holds no usable content.
    Failed { reason: String },
}

impl GenerationState {
    /// True while the pipeline still owns the document.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Pending | Self::Generating)
    }
}

/// Inputs accepted when creating a presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationRequest {
    pub topic: String,
    pub slide_count: usize,
    pub theme: ThemeKind,
    /// Explicit layout mix; `None` lets the generator draw a random order.
    pub layout_mix: Option<Vec<LayoutKind>>,
    pub template_id: Option<Uuid>,
}

impl PresentationRequest {
    /// Validate request bounds.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` for a blank topic, an out-of-range slide
    /// count, or a layout mix whose length disagrees with the slide count.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.topic.trim().is_empty() {
            return Err(DomainError::invalid_request("topic must not be empty"));
        }
        if !(MIN_SLIDE_COUNT..=MAX_SLIDE_COUNT).contains(&self.slide_count) {
            return Err(DomainError::invalid_request(format!(
                "slide count must be between {MIN_SLIDE_COUNT} and {MAX_SLIDE_COUNT}"
            )));
        }
        if let Some(mix) = &self.layout_mix {
            if mix.len() != self.slide_count {
                return Err(DomainError::invalid_request(
                    "layout mix must list one layout per slide",
                ));
            }
        }
        Ok(())
    }
}

/// The presentation aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresentationDocument {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub topic: String,
    pub theme: ThemeKind,
    #[serde(flatten)]
    pub state: GenerationState,
    pub slides: Vec<Slide>,
    /// One layout per slide, drawn once at generation time. Documents written
    /// before this field existed persist `null`; rendering then derives each
    /// slide's layout from its own content tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_order: Option<Vec<LayoutKind>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row exposed by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresentationSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub theme: ThemeKind,
    pub generating: bool,
    pub slides_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PresentationDocument {
    /// Create a pending document from a validated request.
    ///
    /// # Errors
    ///
    /// Propagates request validation failures.
    pub fn from_request(request: &PresentationRequest) -> Result<Self, DomainError> {
        request.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title: request.topic.trim().to_owned(),
            description: String::new(),
            topic: request.topic.trim().to_owned(),
            theme: request.theme,
            state: GenerationState::Pending,
            slides: Vec::new(),
            layout_order: None,
            template_id: request.template_id,
            presentation_url: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Number of live slides. The persisted `slides_count` column mirrors
    /// this value after every mutation.
    pub fn slides_count(&self) -> usize {
        self.slides.len()
    }

    /// Whether the document can be exported.
    pub fn is_export_ready(&self) -> bool {
        self.state == GenerationState::Ready && !self.slides.is_empty()
    }

    /// Listing row for this document.
    pub fn summary(&self) -> PresentationSummary {
        PresentationSummary {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            theme: self.theme,
            generating: self.state.is_in_flight(),
            slides_count: self.slides_count(),
            presentation_url: self.presentation_url.clone(),
            created_at: self.created_at,
        }
    }

    /// `Pending -> Generating`.
    ///
    /// # Errors
    ///
    /// Returns an internal error for any other starting state.
    pub fn begin_generation(&mut self) -> Result<(), DomainError> {
        if self.state != GenerationState::Pending {
            return Err(DomainError::internal(
                "generation can only start from the pending state",
            ));
        }
        self.state = GenerationState::Generating;
        self.touch();
        Ok(())
    }

    /// `Generating -> Ready`, installing the generated content.
    ///
    /// # Errors
    ///
    /// Returns an internal error when not generating, when the slide set is
    /// empty, or when the layout order length disagrees with the slide count.
    pub fn complete_generation(
        &mut self,
        title: String,
        description: String,
        slides: Vec<Slide>,
        layout_order: Vec<LayoutKind>,
    ) -> Result<(), DomainError> {
        if self.state != GenerationState::Generating {
            return Err(DomainError::internal(
                "completion requires the generating state",
            ));
        }
        if slides.is_empty() {
            return Err(DomainError::internal("a ready document must hold slides"));
        }
        if layout_order.len() != slides.len() {
            return Err(DomainError::internal(
                "layout order must assign one layout per slide",
            ));
        }
        self.title = title;
        self.description = description;
        self.slides = slides;
        self.layout_order = Some(layout_order);
        self.state = GenerationState::Ready;
        self.touch();
        Ok(())
    }

    /// `Pending | Generating -> Failed`.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the document already settled.
    pub fn fail_generation(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        if !self.state.is_in_flight() {
            return Err(DomainError::internal("document has already settled"));
        }
        self.state = GenerationState::Failed {
            reason: reason.into(),
        };
        self.touch();
        Ok(())
    }

    /// Replace one slide's content.
    ///
    /// Clears `presentation_url`: an exported file no longer matches the
    /// document after an edit.
    ///
    /// # Errors
    ///
    /// Returns `conflict` while in flight, `not_found` for an unknown slide
    /// id, and propagates content validation failures.
    pub fn patch_slide(
        &mut self,
        slide_id: Uuid,
        content: SlideContent,
    ) -> Result<(), DomainError> {
        self.require_settled()?;
        content.validate()?;
        let slide = self
            .slides
            .iter_mut()
            .find(|slide| slide.id == slide_id)
            .ok_or_else(|| DomainError::not_found(format!("no slide {slide_id}")))?;
        slide.content = content;
        self.presentation_url = None;
        self.touch();
        Ok(())
    }

    /// Reorder slides by id.
    ///
    /// The given sequence must be a bijection over the current slide ids.
    /// Clears `presentation_url`.
    ///
    /// # Errors
    ///
    /// Returns `conflict` while in flight and `invalid_request` when the
    /// sequence misses, repeats, or invents ids.
    pub fn reorder_slides(&mut self, order: &[Uuid]) -> Result<(), DomainError> {
        self.require_settled()?;
        if order.len() != self.slides.len() {
            return Err(DomainError::invalid_request(
                "reorder must list every slide exactly once",
            ));
        }
        let current: std::collections::HashSet<Uuid> =
            self.slides.iter().map(|slide| slide.id).collect();
        let mut seen = std::collections::HashSet::new();
        for id in order {
            if !current.contains(id) || !seen.insert(*id) {
                return Err(DomainError::invalid_request(format!(
                    "reorder names a slide that does not exist or repeats: {id}"
                )));
            }
        }
        let mut by_id: std::collections::HashMap<Uuid, Slide> = self
            .slides
            .drain(..)
            .map(|slide| (slide.id, slide))
            .collect();
        self.slides = order.iter().filter_map(|id| by_id.remove(id)).collect();
        self.presentation_url = None;
        self.touch();
        Ok(())
    }

    /// Record a completed export.
    pub fn mark_exported(&mut self, url: impl Into<String>) {
        self.presentation_url = Some(url.into());
        self.touch();
    }

    fn require_settled(&self) -> Result<(), DomainError> {
        if self.state.is_in_flight() {
            return Err(DomainError::conflict(
                "presentation is still generating",
            ));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
