//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use skyseat_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Whether repeating the request may succeed.
    pub retryable: bool,
}

/// An [`AppError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::UnknownRequester | ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::PoolExhausted
        | ErrorKind::ExhaustedCandidates
        | ErrorKind::ConstraintViolation
        | ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::Database
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);
        if status.is_server_error() && status != StatusCode::GATEWAY_TIMEOUT {
            tracing::error!(kind = %err.kind, error = %err, "Internal server error");
        }

        let body = ApiErrorResponse {
            success: false,
            error: err.kind.as_str().to_string(),
            message: err.message,
            retryable: err.kind.is_retryable(),
        };

        (status, Json(body)).into_response()
    }
}
