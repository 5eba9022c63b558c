//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{presentation_templates, presentations};

/// Row struct for reading a full presentation document.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = presentations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PresentationDocumentRow {
    #[expect(dead_code, reason = "the JSONB document carries the id")]
    pub id: Uuid,
    /// FK column; authoritative over the JSON copy because the database
    /// nulls it when the referenced template is deleted.
    pub presentation_template_id: Option<Uuid>,
    pub document: serde_json::Value,
}

/// Row struct for listing presentation summaries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = presentations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PresentationSummaryRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub theme: String,
    pub generating: bool,
    pub slides_count: i32,
    pub presentation_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Upsert struct covering every mutable presentation column.
///
/// `treat_none_as_null` makes updates write NULL for cleared optionals, so
/// an edit that drops the export URL actually clears the column.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = presentations)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PresentationUpsert<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub topic: &'a str,
    pub theme: &'a str,
    pub generating: bool,
    pub slides_count: i32,
    pub presentation_url: Option<&'a str>,
    pub presentation_template_id: Option<Uuid>,
    pub document: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading templates.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = presentation_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TemplateRow {
    pub id: Uuid,
    pub title: String,
    pub slides: serde_json::Value,
    #[expect(dead_code, reason = "schema field kept for listing order")]
    pub created_at: DateTime<Utc>,
}

/// Upsert struct for templates.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = presentation_templates)]
pub(crate) struct TemplateUpsert<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub slides: &'a serde_json::Value,
}
