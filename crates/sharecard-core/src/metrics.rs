//! Prometheus metrics helpers for sharecard.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sharecard_core::metrics::{start_metrics_server, try_init_metrics};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     if let Some(handle) = try_init_metrics() {
//!         start_metrics_server(9091, handle).await?;
//!     }
//!
//!     sharecard_core::metrics::increment(sharecard_core::metrics::SHARES_CREATED, 1);
//!     Ok(())
//! }
//! ```
//!
//! # Metric Naming Conventions
//!
//! - Prefix: `sharecard_`
//! - Suffix: `_total` for counters
//! - Labels: only the lookup `outcome`, which has three values

use axum::{Router, routing::get};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;

/// Share links created.
pub const SHARES_CREATED: &str = "sharecard_shares_created_total";

/// Share link lookups, labelled by outcome.
pub const SHARE_LOOKUPS: &str = "sharecard_share_lookups_total";

/// Card images rendered (cache misses only).
pub const IMAGES_RENDERED: &str = "sharecard_og_images_rendered_total";

/// Expired records physically removed by the purge task.
pub const RECORDS_PURGED: &str = "sharecard_records_purged_total";

/// Outcome label values for [`SHARE_LOOKUPS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Resolved,
    NotFound,
    StoreError,
}

impl LookupOutcome {
    /// Label value used in the exported metric.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resolved => "resolved",
            Self::NotFound => "not_found",
            Self::StoreError => "store_error",
        }
    }
}

/// Try to install the Prometheus metrics recorder.
///
/// Returns `None` if a recorder is already installed instead of panicking,
/// so tests and repeated startups stay safe.
pub fn try_init_metrics() -> Option<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder().ok()?;
    register_metrics();
    Some(handle)
}

/// Start the Prometheus metrics HTTP server.
///
/// Serves `/metrics` on the given port from a background task and returns
/// once the listener is bound.
pub async fn start_metrics_server(
    port: u16,
    handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "metrics server listening");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "metrics server stopped");
        }
    });

    Ok(())
}

fn register_metrics() {
    describe_counter!(SHARES_CREATED, "Share links created");
    describe_counter!(
        SHARE_LOOKUPS,
        "Share link lookups (label: outcome = resolved | not_found | store_error)"
    );
    describe_counter!(IMAGES_RENDERED, "Card images rendered to PNG");
    describe_counter!(RECORDS_PURGED, "Expired share records removed from the store");
}

/// Increment a counter.
#[inline]
pub fn increment(name: &'static str, count: u64) {
    metrics::counter!(name).increment(count);
}

/// Record one share lookup with its outcome label.
#[inline]
pub fn record_lookup(outcome: LookupOutcome) {
    metrics::counter!(SHARE_LOOKUPS, "outcome" => outcome.as_str()).increment(1);
}
