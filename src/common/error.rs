// Error handling types for the API

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::{error, warn};

use super::validation::ValidationResult;
use crate::services::graphql::{GraphqlError, RemoteErrorKind};

/// Message returned to clients when the data layer fails in an unexpected way.
/// The upstream detail is logged, never echoed.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Upstream data service error";

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    ValidationError(String),
    BadGateway(String),
    ServiceUnavailable(String),
    InternalServer(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            ApiError::BadGateway(msg) => write!(f, "Bad Gateway: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service Unavailable: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalServer(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let (error_message, code) = match self {
            ApiError::Unauthorized(msg) => (msg, "UNAUTHORIZED"),
            ApiError::Forbidden(msg) => (msg, "FORBIDDEN"),
            ApiError::BadRequest(msg) => (msg, "BAD_REQUEST"),
            ApiError::NotFound(msg) => (msg, "NOT_FOUND"),
            ApiError::Conflict(msg) => (msg, "CONFLICT"),
            ApiError::ValidationError(msg) => (msg, "VALIDATION_ERROR"),
            ApiError::BadGateway(msg) => (msg, "BAD_GATEWAY"),
            ApiError::ServiceUnavailable(msg) => (msg, "SERVICE_UNAVAILABLE"),
            ApiError::InternalServer(msg) => (msg, "INTERNAL_SERVER_ERROR"),
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Helper function to convert ValidationResult to ApiError
impl From<ValidationResult> for ApiError {
    fn from(result: ValidationResult) -> Self {
        if result.is_valid {
            ApiError::InternalServer(
                "Validation result was valid but converted to error".to_string(),
            )
        } else {
            let error_messages: Vec<String> = result
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            ApiError::ValidationError(error_messages.join(", "))
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "Rejected request body");
        ApiError::BadRequest("Invalid request body".to_string())
    }
}

/// The remote layer reports uniqueness and foreign-key failures under the
/// same code; only the message tells them apart.
fn is_foreign_key_violation(message: &str) -> bool {
    message.to_ascii_lowercase().contains("foreign key")
}

impl From<GraphqlError> for ApiError {
    fn from(err: GraphqlError) -> Self {
        match &err {
            GraphqlError::Remote { kind, message } => match kind {
                RemoteErrorKind::ConstraintViolation if is_foreign_key_violation(message) => {
                    warn!(error = %message, "Referenced resource does not exist");
                    ApiError::NotFound("Resource not found".to_string())
                }
                RemoteErrorKind::ConstraintViolation => {
                    warn!(error = %message, "Remote constraint violation");
                    ApiError::Conflict("Request conflicts with existing data".to_string())
                }
                RemoteErrorKind::AccessDenied => {
                    warn!(error = %message, "Remote layer denied access");
                    ApiError::Forbidden("Access denied".to_string())
                }
                RemoteErrorKind::InvalidJwt => {
                    warn!(error = %message, "Remote layer rejected session token");
                    ApiError::Unauthorized("Invalid token".to_string())
                }
                RemoteErrorKind::NotFound => ApiError::NotFound("Resource not found".to_string()),
                RemoteErrorKind::Validation | RemoteErrorKind::Other(_) => {
                    error!(error = %err, "GraphQL request failed");
                    ApiError::BadGateway(UPSTREAM_FAILURE_MESSAGE.to_string())
                }
            },
            GraphqlError::Transport(e) if e.is_connect() || e.is_timeout() => {
                error!(error = %err, "GraphQL endpoint unreachable");
                ApiError::ServiceUnavailable(UPSTREAM_FAILURE_MESSAGE.to_string())
            }
            _ => {
                error!(error = %err, "GraphQL request failed");
                ApiError::BadGateway(UPSTREAM_FAILURE_MESSAGE.to_string())
            }
        }
    }
}
