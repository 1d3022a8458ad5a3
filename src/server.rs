use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::error::ExtractionError;
use crate::extractor::{ExtractionResult, PageExtractor};

#[derive(Debug, Deserialize)]
struct ScrapeRequest {
    url: Option<String>,
}

pub fn router(extractor: PageExtractor) -> Router {
    Router::new()
        .route("/scrape", post(scrape))
        .with_state(Arc::new(extractor))
}

/// `POST /scrape {"url": "..."}`. Anything without a usable `url`,
/// including an empty or non-JSON body, is a 400.
async fn scrape(
    State(extractor): State<Arc<PageExtractor>>,
    body: Bytes,
) -> Result<Json<ExtractionResult>, ExtractionError> {
    let url = serde_json::from_slice::<ScrapeRequest>(&body)
        .ok()
        .and_then(|request| request.url)
        .filter(|url| !url.trim().is_empty())
        .ok_or(ExtractionError::InvalidInput)?;

    let result = extractor.extract(&url).await?;
    info!("Scrape of {} complete", url);
    Ok(Json(result))
}
