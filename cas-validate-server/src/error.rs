use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use cas_validate::ParseError;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// An error returned by a request handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// One of the answers is malformed.
    #[error("Failed to parse expressions: {0}")]
    BadRequest(#[from] ParseError),

    /// Validation did not finish before the deadline.
    #[error("Validation timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// The validation task panicked or was cancelled.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The status code of the response.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
