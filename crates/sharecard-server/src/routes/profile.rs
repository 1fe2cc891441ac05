//! Query-parameter profile page.
//!
//! Handles `GET /profile?wallet=..&level=..&signals=..&interests=..&name=..`.
//! Renders a card straight from the URL; nothing is read from or written to
//! the store.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Response;

use super::html_response;
use crate::error::CardError;
use crate::params::{CardQuery, card_query_string, og_image_url};
use crate::render::page::{self, PageLinks};
use crate::render::{CardLayout, CardView};
use crate::state::AppState;

/// The page is a pure function of its URL.
const PROFILE_CACHE_CONTROL: &str = "public, max-age=300, s-maxage=86400";

/// Render a profile page from query parameters.
pub async fn profile_page(
    State(state): State<AppState>,
    query: Result<Query<CardQuery>, QueryRejection>,
) -> Result<Response, CardError> {
    let Query(query) = query.map_err(|e| CardError::InvalidInput(e.body_text()))?;

    let layout = query.layout_or(CardLayout::Signals);
    let snapshot = query.into_snapshot();

    let base_url = &state.config.base_url;
    let canonical = format!("{base_url}/profile?{}", card_query_string(&snapshot, layout)?);
    let og_image = og_image_url(base_url, &snapshot, layout)?;

    let markup = page::render(
        &CardView::new(&snapshot, layout),
        PageLinks {
            canonical: &canonical,
            og_image: &og_image,
        },
        &state.config,
    );

    Ok(html_response(markup.into_string(), PROFILE_CACHE_CONTROL))
}
