//! Shared profile pages.
//!
//! Handles `GET /s/{token}`: the page a share link points at. A `.json`
//! suffix returns the stored record instead, for programmatic consumers.

use anyhow::Context;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::html_response;
use crate::error::{ApiError, CardError};
use crate::params::og_image_url;
use crate::render::page::{self, PageLinks};
use crate::render::{CardLayout, CardView};
use crate::resolve::resolve_share;
use crate::state::AppState;

/// Share pages may be cached briefly; the record behind them never changes
/// but does expire.
const SHARE_CACHE_CONTROL: &str = "public, max-age=60, s-maxage=3600, stale-while-revalidate=600";

/// Dispatch on the `.json` suffix.
pub async fn share_handler(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Response {
    match token.strip_suffix(".json") {
        Some(bare) => share_json(&state, bare).await.into_response(),
        None => share_page(&state, &token).await.into_response(),
    }
}

/// Render the share page for a token.
async fn share_page(state: &AppState, token: &str) -> Result<Response, CardError> {
    let record = resolve_share(state.store.as_ref(), token)
        .await
        .into_page_result(token)?;

    let layout = CardLayout::Discovery;
    let canonical = state.config.share_url(&record.token);
    let og_image = og_image_url(&state.config.base_url, &record.snapshot, layout)?;

    let markup = page::render(
        &CardView::new(&record.snapshot, layout),
        PageLinks {
            canonical: &canonical,
            og_image: &og_image,
        },
        &state.config,
    );

    Ok(html_response(markup.into_string(), SHARE_CACHE_CONTROL))
}

/// Return the stored record as JSON.
async fn share_json(state: &AppState, token: &str) -> Result<Response, ApiError> {
    let record = resolve_share(state.store.as_ref(), token)
        .await
        .into_api_result(token)?;

    let mut body = serde_json::to_value(&record).context("serialize share record")?;
    if let Some(obj) = body.as_object_mut() {
        obj.insert("displayName".into(), json!(record.snapshot.display_name()));
        obj.insert("url".into(), json!(state.config.share_url(&record.token)));
    }

    let json_string = serde_json::to_string_pretty(&body).context("encode share record")?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(SHARE_CACHE_CONTROL),
    );

    Ok((StatusCode::OK, headers, json_string).into_response())
}
