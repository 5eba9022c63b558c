//! HTTP error payloads and mapping from domain errors.
//!
//! Keep the domain free of transport concerns by translating [`DomainError`]
//! into Actix responses here.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{DomainError, ErrorCode};
use crate::middleware::trace::{TraceId, TRACE_ID_HEADER};

/// Standard error envelope returned by HTTP adapters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ApiErrorDto", into = "ApiErrorDto")]
pub struct ApiError {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "Something went wrong")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(alias = "trace_id")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation failures raised when constructing an [`ApiError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorValidationError {
    EmptyMessage,
    EmptyTraceId,
}

impl std::fmt::Display for ApiErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
            Self::EmptyTraceId => write!(f, "trace identifier must not be empty"),
        }
    }
}

impl std::error::Error for ApiErrorValidationError {}

impl ApiError {
    /// Construct an API error from a domain failure, capturing any ambient
    /// trace identifier.
    pub fn from_domain(error: DomainError) -> Self {
        Self {
            code: error.code(),
            message: error.message().to_owned(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: error.details().cloned(),
        }
    }

    /// Fallible constructor used by serde conversions.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ApiErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ApiErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        })
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Trace identifier propagated into the response header.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary error details for clients.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    fn to_status_code(&self) -> StatusCode {
        match self.code {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            // Export before readiness is a state conflict, not a client bug.
            ErrorCode::Conflict | ErrorCode::NotReady => StatusCode::CONFLICT,
            ErrorCode::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorCode::UpstreamFailure => StatusCode::BAD_GATEWAY,
            ErrorCode::RenderFailure | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        ApiError::from_domain(value)
    }
}

impl From<actix_web::Error> for ApiError {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to API error");
        ApiError {
            code: ErrorCode::InternalError,
            message: "Internal server error".to_owned(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.to_status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = &self.trace_id {
            builder.insert_header((TRACE_ID_HEADER, id.clone()));
        }
        if matches!(self.code, ErrorCode::InternalError) {
            let mut redacted = self.clone();
            redacted.message = "Internal server error".to_owned();
            redacted.details = None;
            return builder.json(redacted);
        }
        builder.json(self)
    }
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ApiErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(alias = "trace_id")]
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<ApiError> for ApiErrorDto {
    fn from(value: ApiError) -> Self {
        Self {
            code: value.code,
            message: value.message,
            trace_id: value.trace_id,
            details: value.details,
        }
    }
}

impl TryFrom<ApiErrorDto> for ApiError {
    type Error = ApiErrorValidationError;

    fn try_from(value: ApiErrorDto) -> Result<Self, Self::Error> {
        let ApiErrorDto {
            code,
            message,
            trace_id,
            details,
        } = value;

        let mut error = ApiError::try_new(code, message)?;
        if let Some(trace_id) = trace_id {
            if trace_id.trim().is_empty() {
                return Err(ApiErrorValidationError::EmptyTraceId);
            }
            error.trace_id = Some(trace_id);
        } else {
            error.trace_id = None;
        }
        error.details = details;
        Ok(error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST)]
    #[case(ErrorCode::Conflict, StatusCode::CONFLICT)]
    #[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
    #[case(ErrorCode::NotReady, StatusCode::CONFLICT)]
    #[case(ErrorCode::UpstreamTimeout, StatusCode::GATEWAY_TIMEOUT)]
    #[case(ErrorCode::UpstreamFailure, StatusCode::BAD_GATEWAY)]
    #[case(ErrorCode::RenderFailure, StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_expected_statuses(#[case] code: ErrorCode, #[case] status: StatusCode) {
        let error = ApiError::from_domain(DomainError::new(code, "boom"));
        assert_eq!(error.status_code(), status);
    }

    #[rstest]
    fn from_domain_preserves_message_and_details() {
        let domain = DomainError::invalid_request("reorder must be a permutation")
            .with_details(json!({ "missing": ["8f9b"] }));
        let api = ApiError::from_domain(domain);
        assert_eq!(api.code(), ErrorCode::InvalidRequest);
        assert_eq!(api.message(), "reorder must be a permutation");
        assert_eq!(api.details(), Some(&json!({ "missing": ["8f9b"] })));
    }

    #[tokio::test]
    async fn internal_errors_are_redacted_in_responses() {
        let api = ApiError::from_domain(
            DomainError::internal("pool exhausted").with_details(json!({ "pool": "pg" })),
        );
        let response = api.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = actix_web::body::to_bytes(response.into_body())
            .await
            .expect("body bytes");
        let value: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(value["message"], "Internal server error");
        assert!(value.get("details").is_none());
    }

    #[tokio::test]
    async fn non_internal_errors_keep_their_message() {
        let api = ApiError::from_domain(DomainError::not_ready("generation in progress"));
        let response = api.error_response();
        let body = actix_web::body::to_bytes(response.into_body())
            .await
            .expect("body bytes");
        let value: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(value["code"], "not_ready");
        assert_eq!(value["message"], "generation in progress");
    }

    #[rstest]
    fn serde_rejects_blank_trace_identifiers() {
        let result: Result<ApiError, _> = serde_json::from_value(json!({
            "code": "not_found",
            "message": "missing",
            "traceId": "  ",
        }));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn from_domain_captures_ambient_trace_id() {
        let trace_id = "0c7dd2f5-4a0e-43d0-9de5-2c4f79f0f9d3"
            .parse::<TraceId>()
            .expect("valid trace id");
        let api = TraceId::scope(trace_id, async {
            ApiError::from_domain(DomainError::not_found("missing"))
        })
        .await;
        assert_eq!(api.trace_id(), Some(trace_id.to_string().as_str()));
    }
}
