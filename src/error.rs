use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failures of a single extraction. Only the first three ever reach a caller.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("URL is required")]
    InvalidInput,

    #[error("Error fetching the page")]
    PageFetch,

    #[error("Button not found")]
    ButtonNotFound,

    /// Recovered inside the stylesheet fetcher and only logged
    #[error("Error fetching or parsing CSS from {url}: {reason}")]
    Stylesheet { url: String, reason: String },
}

impl ExtractionError {
    pub fn status(&self) -> StatusCode {
        match self {
            ExtractionError::InvalidInput => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ExtractionError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
