//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mockcrm_core::CrmError;
use serde::Serialize;
use thiserror::Error;

/// Result type for server lifecycle operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that stop the server from running.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Binding or serving failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned from request handlers.
///
/// Rendered as `{"error": "<message>"}` with a 4xx status.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The core rejected the request.
    #[error(transparent)]
    Crm(#[from] CrmError),

    /// The request body was not valid JSON for the endpoint.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Returns the HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Crm(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Crm(_) | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::MalformedBody(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
