//! Web surface errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebError {
    /// The blocking render task panicked or was cancelled.
    #[error("render task failed: {0}")]
    Render(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Error response JSON structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let error = match self {
            Self::Render(_) => "RenderFailed",
            Self::Io(_) => "Io",
        };
        tracing::error!(%self, "request failed");

        let body = Json(ErrorResponse {
            error,
            message: self.to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
