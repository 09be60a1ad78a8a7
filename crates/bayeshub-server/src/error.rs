//! Mapping from registry errors to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bayeshub_core::Error;
use serde_json::json;

/// Error returned by request handlers
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct AppError(#[from] pub Error);

impl AppError {
    /// HTTP status for the wrapped error
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::NotFound(_) | Error::UnknownClass { .. } => StatusCode::NOT_FOUND,
            Error::AlreadyExists(_) => StatusCode::CONFLICT,
            Error::InvalidClassSet(_) | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Engine(_) | Error::Serialization(_) | Error::Config(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short machine-readable kind, used as a metrics label
    pub fn kind(&self) -> &'static str {
        self.0.kind()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}
