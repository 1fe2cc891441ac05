//! Open Graph image generation.
//!
//! Handles `GET /api/og?wallet=..&level=..&layout=..`: a 1200x630 PNG card
//! drawn from query parameters alone. Missing values take their defaults, so
//! the endpoint always returns an image.
//!
//! Images are cached in-memory, keyed by the canonical parameter string, to
//! avoid re-rendering on repeated requests.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use sharecard_core::metrics::{self as m, increment};

use crate::error::CardError;
use crate::params::{CardQuery, card_query_string};
use crate::render::components::etag_for;
use crate::render::image::{ImageContext, render_png};
use crate::render::{CardLayout, CardView};
use crate::state::AppState;

/// Handle a request for a card image.
pub async fn og_image(
    State(state): State<AppState>,
    query: Result<Query<CardQuery>, QueryRejection>,
) -> Result<Response, CardError> {
    let Query(query) = query.map_err(|e| CardError::InvalidInput(e.body_text()))?;

    let layout = query.layout_or(CardLayout::Signals);
    let snapshot = query.into_snapshot();
    let key = card_query_string(&snapshot, layout)?;

    if let Some(cached) = state.og_cache.get(&key).await {
        tracing::debug!(key = %key, "og image cache hit");
        return Ok(png_response(cached));
    }

    tracing::debug!(key = %key, "og image cache miss, generating");

    // Rasterizing is CPU-bound; keep it off the async workers
    let config = state.config.clone();
    let png_bytes = tokio::task::spawn_blocking(move || {
        let ctx = ImageContext {
            site_name: &config.site_name,
            footer: config.public_host(),
            interest_limit: config.image_interest_limit,
        };
        render_png(&CardView::new(&snapshot, layout), &ctx)
    })
    .await
    .map_err(|e| CardError::Internal(anyhow::anyhow!("image render task failed: {e}")))??;

    increment(m::IMAGES_RENDERED, 1);
    state.og_cache.insert(key, png_bytes.clone()).await;

    Ok(png_response(png_bytes))
}

/// Build an HTTP response with PNG content and cache headers.
fn png_response(png_bytes: Vec<u8>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=86400, s-maxage=604800, immutable"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    if let Ok(val) = HeaderValue::from_str(&etag_for(&png_bytes)) {
        headers.insert(header::ETAG, val);
    }

    (StatusCode::OK, headers, png_bytes).into_response()
}
