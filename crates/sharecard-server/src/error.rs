//! Error types for the share card service.
//!
//! Page routes render [`CardError`] as small HTML error pages; the share API
//! answers with [`ApiError`] as a JSON `{"error": ...}` body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{DOCTYPE, html};
use serde_json::json;
use sharecard_core::{SnapshotError, StoreError};

/// Errors from page and image routes.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    /// The request could not be interpreted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No live share exists for the token.
    #[error("not found: {0}")]
    NotFound(String),

    /// The share store could not answer.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error (rendering, encoding, etc.).
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for CardError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            Self::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                "Invalid Request",
                format!("The request could not be understood: {msg}"),
            ),
            Self::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "Link Not Found",
                "This share link does not exist or has expired.".to_string(),
            ),
            Self::Store(err) => {
                tracing::error!(error = %err, "share store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Service Unavailable",
                    "Shared profiles are temporarily unavailable. Please try again later."
                        .to_string(),
                )
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Error",
                    "An internal error occurred. Please try again later.".to_string(),
                )
            }
        };

        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (title) }
                    meta name="robots" content="noindex";
                    style { (maud::PreEscaped(crate::render::components::ERROR_CSS)) }
                }
                body {
                    main class="error-page" {
                        h1 { (title) }
                        p { (message) }
                        a href="/" { "Back to home" }
                    }
                }
            }
        };

        (status, markup).into_response()
    }
}

/// Errors from the JSON API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed body or missing required field.
    #[error("{0}")]
    BadRequest(String),

    /// No live share exists for the token.
    #[error("not found: {0}")]
    NotFound(String),

    /// The share store failed while creating a link.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The share store failed while reading a link.
    #[error("store error: {0}")]
    Unavailable(StoreError),

    /// Internal server error (encoding, etc.).
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SnapshotError> for ApiError {
    fn from(err: SnapshotError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<sharecard_core::Error> for ApiError {
    fn from(err: sharecard_core::Error) -> Self {
        match err {
            sharecard_core::Error::Json(e) => {
                tracing::debug!(error = %e, "request body is not JSON");
                Self::BadRequest("Invalid JSON body".to_string())
            }
            other => Self::BadRequest(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "Share link not found".to_string()),
            Self::Store(err) => {
                tracing::error!(error = %err, "share store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to create share link".to_string(),
                )
            }
            Self::Unavailable(err) => {
                tracing::error!(error = %err, "share store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Share links are temporarily unavailable, try again later".to_string(),
                )
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
