//! PostgreSQL-backed `TemplateRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{TemplateRepository, TemplateRepositoryError};
use crate::domain::{PresentationTemplate, TemplateSlideSpec};

use super::models::{TemplateRow, TemplateUpsert};
use super::pool::{DbPool, PoolError};
use super::schema::presentation_templates;

/// Diesel-backed implementation of the `TemplateRepository` port.
#[derive(Clone)]
pub struct DieselTemplateRepository {
    pool: DbPool,
}

impl DieselTemplateRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TemplateRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            TemplateRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> TemplateRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            TemplateRepositoryError::connection("database connection error")
        }
        _ => TemplateRepositoryError::query("database error"),
    }
}

fn row_to_template(row: TemplateRow) -> Result<PresentationTemplate, TemplateRepositoryError> {
    let slides: Vec<TemplateSlideSpec> = serde_json::from_value(row.slides).map_err(|error| {
        TemplateRepositoryError::query(format!("stored template is unreadable: {error}"))
    })?;
    Ok(PresentationTemplate {
        id: row.id,
        title: row.title,
        slides,
    })
}

#[async_trait]
impl TemplateRepository for DieselTemplateRepository {
    async fn find_by_id(
        &self,
        template_id: &Uuid,
    ) -> Result<Option<PresentationTemplate>, TemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TemplateRow> = presentation_templates::table
            .filter(presentation_templates::id.eq(template_id))
            .select(TemplateRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_template).transpose()
    }

    async fn list(&self) -> Result<Vec<PresentationTemplate>, TemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TemplateRow> = presentation_templates::table
            .order(presentation_templates::created_at.asc())
            .select(TemplateRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_template).collect()
    }

    async fn save(&self, template: &PresentationTemplate) -> Result<(), TemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let slides = serde_json::to_value(&template.slides).map_err(|error| {
            TemplateRepositoryError::query(format!("template is unserialisable: {error}"))
        })?;
        let upsert = TemplateUpsert {
            id: template.id,
            title: &template.title,
            slides: &slides,
        };

        diesel::insert_into(presentation_templates::table)
            .values(&upsert)
            .on_conflict(presentation_templates::id)
            .do_update()
            .set(&upsert)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, template_id: &Uuid) -> Result<bool, TemplateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            presentation_templates::table.filter(presentation_templates::id.eq(template_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
