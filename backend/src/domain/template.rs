//! Presentation templates: reusable slide-layout skeletons.
//!
//! A template names an ordered sequence of layout kinds plus the placeholder
//! fields a generator should fill for each. Presentations may reference a
//! template; deleting the template nulls the reference without touching the
//! presentation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::DomainError;
use super::layout::LayoutKind;

/// One slide skeleton inside a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSlideSpec {
    pub layout: LayoutKind,
    /// Placeholder field names the generator fills, e.g. `title`, `bullets`.
    pub placeholders: Vec<String>,
}

/// A stored template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresentationTemplate {
    pub id: Uuid,
    pub title: String,
    pub slides: Vec<TemplateSlideSpec>,
}

impl PresentationTemplate {
    /// Create a template, validating its shape.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` for a blank title or an empty slide list.
    pub fn new(
        title: impl Into<String>,
        slides: Vec<TemplateSlideSpec>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::invalid_request("template title must not be empty"));
        }
        if slides.is_empty() {
            return Err(DomainError::invalid_request(
                "templates must describe at least one slide",
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            slides,
        })
    }

    /// Layout sequence this template prescribes.
    pub fn layout_mix(&self) -> Vec<LayoutKind> {
        self.slides.iter().map(|spec| spec.layout).collect()
    }
}
