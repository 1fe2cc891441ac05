//! Sharecard Server - short share links and preview cards for user profiles.
//!
//! A client posts a profile snapshot and gets back a short public URL. The
//! URL serves an HTML page whose Open Graph tags point at a generated card
//! image, so the link unfurls into a rich preview wherever it is pasted.
//!
//! # Architecture
//!
//! - **Store**: snapshots persist for 30 days under a 6-character token
//!   (see `sharecard_core::store`)
//! - **Resolve**: a token maps to resolved, not found, or store error
//! - **Render**: one card view, two layouts, drawn as HTML with maud or as a
//!   PNG with resvg
//! - **Cache**: in-process moka cache for images + Cache-Control headers for CDNs
//!
//! # URL Pattern
//!
//! ```text
//! POST /api/share          -> {"url", "id", "expiresAt"}
//! GET  /s/{token}          -> share page
//! GET  /s/{token}.json     -> stored record
//! GET  /profile?...        -> page from query parameters
//! GET  /api/og?...         -> 1200x630 PNG card
//! ```
//!
//! # Security
//!
//! - All dynamic content is HTML-escaped by maud and XML-escaped in SVG
//! - Strict Content-Security-Policy: no JavaScript execution
//! - X-Frame-Options: DENY prevents clickjacking

pub mod config;
pub mod error;
pub mod params;
pub mod render;
pub mod resolve;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{ApiError, CardError};
pub use routes::router;
pub use state::AppState;
