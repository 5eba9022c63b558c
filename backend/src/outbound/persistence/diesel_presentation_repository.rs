//! PostgreSQL-backed `PresentationRepository` implementation using Diesel.
//!
//! The document column holds the authoritative JSON; scalar columns are
//! kept in step on every save so listings never parse JSON.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{PresentationRepository, PresentationRepositoryError};
use crate::domain::{PresentationDocument, PresentationSummary, ThemeKind};

use super::models::{PresentationDocumentRow, PresentationSummaryRow, PresentationUpsert};
use super::pool::{DbPool, PoolError};
use super::schema::presentations;

/// Diesel-backed implementation of the `PresentationRepository` port.
#[derive(Clone)]
pub struct DieselPresentationRepository {
    pool: DbPool,
}

impl DieselPresentationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PresentationRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PresentationRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> PresentationRepositoryError {
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
            PresentationRepositoryError::connection("database connection error")
        }
        _ => PresentationRepositoryError::query("database error"),
    }
}

fn row_to_document(
    row: PresentationDocumentRow,
) -> Result<PresentationDocument, PresentationRepositoryError> {
    let mut document: PresentationDocument =
        serde_json::from_value(row.document).map_err(|error| {
            PresentationRepositoryError::query(format!("stored document is unreadable: {error}"))
        })?;
    // The FK column wins over the JSON copy: template deletion nulls the
    // column without rewriting stored documents.
    document.template_id = row.presentation_template_id;
    Ok(document)
}

fn row_to_summary(row: PresentationSummaryRow) -> PresentationSummary {
    let theme = row.theme.parse::<ThemeKind>().unwrap_or_else(|_| {
        warn!(
            value = row.theme,
            presentation_id = %row.id,
            "unrecognised theme value, defaulting to minimalist"
        );
        ThemeKind::Minimalist
    });
    PresentationSummary {
        id: row.id,
        title: row.title,
        description: row.description,
        theme,
        generating: row.generating,
        slides_count: usize::try_from(row.slides_count).unwrap_or_default(),
        presentation_url: row.presentation_url,
        created_at: row.created_at,
    }
}

/// Cast the slide count for the denormalised column.
#[expect(
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    reason = "slide counts are bounded far below i32::MAX"
)]
fn cast_slides_count(count: usize) -> i32 {
    count as i32
}

#[async_trait]
impl PresentationRepository for DieselPresentationRepository {
    async fn find_by_id(
        &self,
        presentation_id: &Uuid,
    ) -> Result<Option<PresentationDocument>, PresentationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PresentationDocumentRow> = presentations::table
            .filter(presentations::id.eq(presentation_id))
            .select(PresentationDocumentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_document).transpose()
    }

    async fn list_summaries(
        &self,
    ) -> Result<Vec<PresentationSummary>, PresentationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PresentationSummaryRow> = presentations::table
            .order(presentations::created_at.desc())
            .select(PresentationSummaryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_summary).collect())
    }

    async fn save(
        &self,
        document: &PresentationDocument,
    ) -> Result<(), PresentationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let json = serde_json::to_value(document).map_err(|error| {
            PresentationRepositoryError::query(format!("document is unserialisable: {error}"))
        })?;
        let upsert = PresentationUpsert {
            id: document.id,
            title: &document.title,
            description: &document.description,
            topic: &document.topic,
            theme: document.theme.as_str(),
            generating: document.state.is_in_flight(),
            slides_count: cast_slides_count(document.slides_count()),
            presentation_url: document.presentation_url.as_deref(),
            presentation_template_id: document.template_id,
            document: &json,
            created_at: document.created_at,
            updated_at: document.updated_at,
        };

        diesel::insert_into(presentations::table)
            .values(&upsert)
            .on_conflict(presentations::id)
            .do_update()
            .set(&upsert)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(
        &self,
        presentation_id: &Uuid,
    ) -> Result<bool, PresentationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            presentations::table.filter(presentations::id.eq(presentation_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::{PresentationRequest, ThemeKind};

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(
            repo_err,
            PresentationRepositoryError::Connection { .. }
        ));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(
            repo_err,
            PresentationRepositoryError::Query { .. }
        ));
    }

    #[rstest]
    fn documents_round_trip_through_the_json_column() {
        let request = PresentationRequest {
            topic: "Rivers".to_owned(),
            slide_count: 4,
            theme: ThemeKind::Professional,
            layout_mix: None,
            template_id: None,
        };
        let document = PresentationDocument::from_request(&request).expect("valid request");

        let json = serde_json::to_value(&document).expect("serialises");
        let row = PresentationDocumentRow {
            id: document.id,
            presentation_template_id: document.template_id,
            document: json,
        };
        let restored = row_to_document(row).expect("deserialises");
        assert_eq!(restored, document);
    }

    #[rstest]
    fn a_nulled_template_column_overrides_the_stored_json_copy() {
        let request = PresentationRequest {
            topic: "Rivers".to_owned(),
            slide_count: 4,
            theme: ThemeKind::Professional,
            layout_mix: None,
            template_id: Some(Uuid::new_v4()),
        };
        let document = PresentationDocument::from_request(&request).expect("valid request");
        let json = serde_json::to_value(&document).expect("serialises");

        // The template was deleted after this document was saved, so the FK
        // column is NULL while the JSON still carries the old id.
        let row = PresentationDocumentRow {
            id: document.id,
            presentation_template_id: None,
            document: json,
        };
        let restored = row_to_document(row).expect("deserialises");
        assert_eq!(restored.template_id, None);
    }

    #[rstest]
    fn a_corrupt_document_column_maps_to_a_query_error() {
        let row = PresentationDocumentRow {
            id: Uuid::new_v4(),
            presentation_template_id: None,
            document: serde_json::json!({"not": "a document"}),
        };
        let error = row_to_document(row).expect_err("corrupt JSON fails");
        assert!(matches!(error, PresentationRepositoryError::Query { .. }));
    }

    #[rstest]
    fn summary_rows_parse_the_theme_with_a_fallback() {
        let row = PresentationSummaryRow {
            id: Uuid::new_v4(),
            title: "Rivers".to_owned(),
            description: String::new(),
            theme: "no-such-theme".to_owned(),
            generating: false,
            slides_count: 4,
            presentation_url: None,
            created_at: Utc::now(),
        };
        let summary = row_to_summary(row);
        assert_eq!(summary.theme, ThemeKind::Minimalist);
        assert_eq!(summary.slides_count, 4);
    }
}
