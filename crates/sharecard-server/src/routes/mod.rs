//! Route definitions for the share card service.
//!
//! ## Routes
//!
//! - `GET /` - Home page
//! - `GET /health` - Health check (JSON)
//! - `GET /robots.txt` - Crawler instructions
//! - `POST /api/share` - Create a share link from a profile snapshot
//! - `GET /api/og` - Card image (PNG) from query parameters
//! - `GET /s/{token}` - Shared profile page (or `.json` for the raw record)
//! - `GET /profile` - Profile page from query parameters, nothing stored

mod health;
mod home;
mod og;
mod profile;
mod share;
mod shared;

use axum::Router;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::render::components::{CSP_HEADER, etag_for};
use crate::state::AppState;

pub use share::ShareResponse;

/// Build the complete service router.
///
/// Every route answers cross-origin requests from any origin, so the browser
/// extension can call the share API directly.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home_page))
        .route("/health", get(health::health_check))
        .route("/robots.txt", get(robots_txt))
        .route("/api/share", post(share::create_share))
        .route("/api/og", get(og::og_image))
        .route("/s/{token}", get(shared::share_handler))
        .route("/profile", get(profile::profile_page))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .with_state(state)
}

/// Serve robots.txt allowing all crawlers.
///
/// We want crawlers to fetch these pages for link previews.
async fn robots_txt() -> impl IntoResponse {
    (
        [("content-type", "text/plain; charset=utf-8")],
        "User-agent: *\nAllow: /\n",
    )
}

/// Build an HTML response with security, ETag and cache headers.
fn html_response(html: String, cache_control: &'static str) -> Response {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );

    // Security headers
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CSP_HEADER),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    if let Ok(val) = HeaderValue::from_str(&etag_for(html.as_bytes())) {
        headers.insert(header::ETAG, val);
    }
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_control));

    (StatusCode::OK, headers, html).into_response()
}
