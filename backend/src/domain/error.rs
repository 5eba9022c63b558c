//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// A mutation was attempted while the presentation is still generating.
    Conflict,
    /// The requested presentation, template, or slide does not exist.
    NotFound,
    /// Export was requested before the presentation reached its ready state.
    NotReady,
    /// An external provider exceeded its timeout bound with no fallback left.
    UpstreamTimeout,
    /// An external provider returned unusable data with no fallback left.
    UpstreamFailure,
    /// PPTX assembly failed; no partial file is produced.
    RenderFailure,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use backend::domain::{DomainError, ErrorCode};
///
/// let err = DomainError::new(ErrorCode::NotFound, "missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "DomainErrorDto", into = "DomainErrorDto")]
pub struct DomainError {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "Something went wrong")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainErrorValidationError {
    EmptyMessage,
}

impl std::fmt::Display for DomainErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for DomainErrorValidationError {}

impl DomainError {
    /// Create a new error. An empty message is replaced with the code name so
    /// construction never panics inside service code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(_) => Self {
                code,
                message: format!("{code:?}"),
                details: None,
            },
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, DomainErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(DomainErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{DomainError, ErrorCode};
    /// use serde_json::json;
    ///
    /// let err = DomainError::new(ErrorCode::InvalidRequest, "bad")
    ///     .with_details(json!({ "field": "theme" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::NotReady`].
    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotReady, message)
    }

    /// Convenience constructor for [`ErrorCode::UpstreamTimeout`].
    pub fn upstream_timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamTimeout, message)
    }

    /// Convenience constructor for [`ErrorCode::UpstreamFailure`].
    pub fn upstream_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamFailure, message)
    }

    /// Convenience constructor for [`ErrorCode::RenderFailure`].
    pub fn render_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RenderFailure, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DomainError {}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct DomainErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<DomainError> for DomainErrorDto {
    fn from(value: DomainError) -> Self {
        Self {
            code: value.code,
            message: value.message,
            details: value.details,
        }
    }
}

impl TryFrom<DomainErrorDto> for DomainError {
    type Error = DomainErrorValidationError;

    fn try_from(value: DomainErrorDto) -> Result<Self, Self::Error> {
        let DomainErrorDto {
            code,
            message,
            details,
        } = value;

        let mut error = DomainError::try_new(code, message)?;
        error.details = details;
        Ok(error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn constructors_carry_code_and_message() {
        let err = DomainError::conflict("presentation is still generating");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "presentation is still generating");
        assert!(err.details().is_none());
    }

    #[rstest]
    fn try_new_rejects_blank_messages() {
        let err = DomainError::try_new(ErrorCode::NotFound, "   ");
        assert_eq!(err, Err(DomainErrorValidationError::EmptyMessage));
    }

    #[rstest]
    fn new_substitutes_code_name_for_blank_messages() {
        let err = DomainError::new(ErrorCode::NotReady, "");
        assert!(!err.message().trim().is_empty());
    }

    #[rstest]
    fn serialises_code_as_snake_case() {
        let err = DomainError::upstream_timeout("image search timed out");
        let value = serde_json::to_value(&err).expect("serialise");
        assert_eq!(value["code"], "upstream_timeout");
    }

    #[rstest]
    fn details_round_trip_through_serde() {
        let err = DomainError::invalid_request("reorder must be a permutation")
            .with_details(json!({ "missing": ["8f9b"] }));
        let value = serde_json::to_value(&err).expect("serialise");
        let back: DomainError = serde_json::from_value(value).expect("deserialise");
        assert_eq!(back, err);
    }
}
