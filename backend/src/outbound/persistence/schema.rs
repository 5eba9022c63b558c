//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the deployed database schema exactly. They
//! are used by Diesel for compile-time query validation and type-safe SQL
//! generation. When the schema changes, regenerate this file with
//! `diesel print-schema` or update it by hand.

diesel::table! {
    /// Presentation documents.
    ///
    /// The authoritative document lives in the `document` JSONB column; the
    /// scalar columns are denormalised copies used for listings and filters.
    presentations (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Deck title; the topic until generation completes.
        title -> Varchar,
        /// One-line deck description.
        description -> Text,
        /// The topic the deck was requested for.
        topic -> Text,
        /// Theme name (`minimalist`, `professional`, ...).
        theme -> Varchar,
        /// Whether generation is still in flight.
        generating -> Bool,
        /// Number of slides in the document.
        slides_count -> Int4,
        /// Export URL, set after the first successful export.
        presentation_url -> Nullable<Text>,
        /// Template the deck was created from; ON DELETE SET NULL clears it
        /// when the template is removed.
        presentation_template_id -> Nullable<Uuid>,
        /// Full document as JSON.
        document -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reusable layout templates.
    presentation_templates (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Human-readable template name.
        title -> Varchar,
        /// Ordered slide specs as JSON.
        slides -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(presentations -> presentation_templates (presentation_template_id));

diesel::allow_tables_to_appear_in_same_query!(presentations, presentation_templates);
