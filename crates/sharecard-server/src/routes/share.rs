//! Share link creation.
//!
//! Handles `POST /api/share` with a JSON profile snapshot:
//!
//! ```json
//! { "wallet": "0x...", "level": 5, "trustCircle": 3, "interests": [{"name": "Art", "level": 2}] }
//! ```
//!
//! Only `wallet` is required. The response carries the public URL:
//!
//! ```json
//! { "url": "https://.../s/k3x9qa", "id": "k3x9qa", "expiresAt": "2024-02-01T00:00:00Z" }
//! ```

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sharecard_core::metrics::{self as m, increment};
use sharecard_core::{RawSnapshot, generate_token};

use crate::error::ApiError;
use crate::state::AppState;

/// Successful share creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    /// Public page URL.
    pub url: String,
    /// Share token.
    pub id: String,
    pub expires_at: DateTime<Utc>,
}

/// Create a share link.
///
/// The body is read as raw bytes so a missing or wrong `Content-Type` does
/// not reject an otherwise valid JSON object.
pub async fn create_share(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ShareResponse>, ApiError> {
    let snapshot = RawSnapshot::from_json(&body)?.into_snapshot()?;

    let token = generate_token();
    let record = state
        .store
        .put(&token, &snapshot, state.config.share_ttl)
        .await?;

    increment(m::SHARES_CREATED, 1);
    tracing::info!(
        token = %record.token,
        backend = state.store.backend(),
        expires_at = %record.expires_at,
        "share link created"
    );

    Ok(Json(ShareResponse {
        url: state.config.share_url(&record.token),
        id: record.token,
        expires_at: record.expires_at,
    }))
}
