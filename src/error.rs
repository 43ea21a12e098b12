//! Error types surfaced by the HTTP layer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Errors that can reach a handler.
///
/// Composer validation is not an error: blank text is ignored silently.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// No live session with this id.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Scroll geometry contained NaN or infinite values.
    #[error("Invalid scroll metrics")]
    InvalidScroll,
}

impl ChatError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidScroll => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(error = %self, status = %status, "Request rejected");
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
