//! HTTP error mapping.
//!
//! Every failure leaves the API as `{"error": "<message>"}` with a status
//! derived from the domain error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use madori_core::{Error, FilenameError};
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    Internal(Error),
    Unauthorized(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    PayloadTooLarge(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::PlanNotFound(id) => ApiError::NotFound(format!("Plan not found: {}", id)),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl From<FilenameError> for ApiError {
    fn from(err: FilenameError) -> Self {
        ApiError::BadRequest(format!("{}: {}", err.kind, err.message))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Internal(err) => {
                error!(subsystem = "api", error = %err, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
