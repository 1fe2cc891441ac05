//! Sharecard Server - HTTP server for profile share links and preview cards.
//!
//! Stores profile snapshots behind short links and serves the pages and card
//! images that make those links unfurl.

use axum::http::Request;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use sharecard_core::metrics::{start_metrics_server, try_init_metrics};
use sharecard_server::{AppState, Config, router};

/// Sharecard Server - short share links and preview cards for profiles.
#[derive(Parser, Debug)]
#[command(name = "sharecard-server")]
#[command(about = "Share link and preview card server for user profiles", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load .env file if it exists
    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
        eprintln!("Loaded environment from {}", args.dotenv);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();

    // Metrics exporter (optional)
    if let Some(port) = config.metrics_port {
        match try_init_metrics() {
            Some(handle) => {
                start_metrics_server(port, handle).await?;
            }
            None => tracing::warn!("metrics recorder already installed, skipping exporter"),
        }
    }

    // Create application state
    let state = AppState::new(config)?;
    let _purge = state.spawn_purge_task();

    // Build router with middleware
    let app = router(state).layer(TraceLayer::new_for_http().make_span_with(
        |request: &Request<_>| {
            tracing::span!(
                Level::INFO,
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
            )
        },
    ));

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "starting sharecard server");

    axum::serve(listener, app).await?;

    Ok(())
}
