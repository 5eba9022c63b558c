//! Port for presentation template persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::template::PresentationTemplate;

use super::define_port_error;

define_port_error! {
    /// Errors raised by template repository adapters.
    pub enum TemplateRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "template repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "template repository query failed: {message}",
    }
}

/// Port for template persistence and lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Find a template by its id.
    async fn find_by_id(
        &self,
        template_id: &Uuid,
    ) -> Result<Option<PresentationTemplate>, TemplateRepositoryError>;

    /// List every stored template.
    async fn list(&self) -> Result<Vec<PresentationTemplate>, TemplateRepositoryError>;

    /// Create or update a template.
    async fn save(&self, template: &PresentationTemplate) -> Result<(), TemplateRepositoryError>;

    /// Delete a template. Presentations referencing it keep working; the
    /// database nulls their reference.
    async fn delete(&self, template_id: &Uuid) -> Result<bool, TemplateRepositoryError>;
}

/// Fixture implementation for tests that do not exercise templates.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTemplateRepository;

#[async_trait]
impl TemplateRepository for FixtureTemplateRepository {
    async fn find_by_id(
        &self,
        _template_id: &Uuid,
    ) -> Result<Option<PresentationTemplate>, TemplateRepositoryError> {
        Ok(None)
    }

    async fn list(&self) -> Result<Vec<PresentationTemplate>, TemplateRepositoryError> {
        Ok(Vec::new())
    }

    async fn save(&self, _template: &PresentationTemplate) -> Result<(), TemplateRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _template_id: &Uuid) -> Result<bool, TemplateRepositoryError> {
        Ok(false)
    }
}
