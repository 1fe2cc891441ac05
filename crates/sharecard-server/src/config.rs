//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

/// Default public base URL when no candidate variable is set.
const FALLBACK_BASE_URL: &str = "http://localhost:8081";

/// Which share record backend to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Durable SQLite database at the given path.
    Sqlite(PathBuf),
    /// Process-local map; records vanish on restart.
    Memory,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8081").
    pub bind_addr: String,

    /// Public base URL used in share links, canonical URLs and OG tags.
    /// Never ends with a slash.
    pub base_url: String,

    /// Product name shown on cards and page titles.
    pub site_name: String,

    /// Call-to-action link shown under share pages.
    pub cta_url: String,

    /// Share record backend.
    pub store: StoreBackend,

    /// Lifetime of a share link.
    pub share_ttl: Duration,

    /// How often expired records are purged. `None` disables the purge task.
    pub purge_interval: Option<Duration>,

    /// Interests drawn on the card image.
    pub image_interest_limit: usize,

    /// Interests listed on HTML pages.
    pub page_interest_limit: usize,

    /// Port for the Prometheus `/metrics` listener, if enabled.
    pub metrics_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - None (all have defaults for local development)
    ///
    /// Optional:
    /// - `SHARECARD_BIND_ADDR`: Server bind address (default: "0.0.0.0:8081")
    /// - `SHARECARD_BASE_URL`, `SHARECARD_PRODUCTION_HOST`, `SHARECARD_DEPLOYMENT_HOST`:
    ///   public base URL candidates, first set wins (see [`resolve_base_url`])
    /// - `SHARECARD_SITE_NAME`: Product name (default: "Sofia")
    /// - `SHARECARD_CTA_URL`: Call-to-action link (default: Chrome Web Store)
    /// - `SHARECARD_STORE`: `sqlite` or `memory` (default: "sqlite")
    /// - `SHARECARD_DB_PATH`: SQLite path (default: "./data/sharecard.db")
    /// - `SHARECARD_SHARE_TTL_SECS`: Share link lifetime (default: 30 days)
    /// - `SHARECARD_PURGE_INTERVAL_SECS`: Purge period, 0 disables (default: 3600)
    /// - `SHARECARD_IMAGE_INTEREST_LIMIT`: Interests on images (default: 5)
    /// - `SHARECARD_PAGE_INTEREST_LIMIT`: Interests on pages (default: 8)
    /// - `SHARECARD_METRICS_PORT`: Enables the Prometheus listener
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("SHARECARD_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let base_url = resolve_base_url(|key| std::env::var(key).ok());

        let site_name =
            std::env::var("SHARECARD_SITE_NAME").unwrap_or_else(|_| "Sofia".to_string());

        let cta_url = std::env::var("SHARECARD_CTA_URL")
            .unwrap_or_else(|_| "https://chromewebstore.google.com".to_string());

        let store = match std::env::var("SHARECARD_STORE")
            .unwrap_or_else(|_| "sqlite".to_string())
            .trim()
            .to_lowercase()
            .as_str()
        {
            "sqlite" => StoreBackend::Sqlite(PathBuf::from(
                std::env::var("SHARECARD_DB_PATH")
                    .unwrap_or_else(|_| "./data/sharecard.db".to_string()),
            )),
            "memory" => StoreBackend::Memory,
            other => anyhow::bail!("SHARECARD_STORE must be 'sqlite' or 'memory', got '{other}'"),
        };

        let share_ttl = Duration::from_secs(env_parse(
            "SHARECARD_SHARE_TTL_SECS",
            sharecard_core::SHARE_TTL.as_secs(),
        )?);

        let purge_secs: u64 = env_parse("SHARECARD_PURGE_INTERVAL_SECS", 3600)?;
        let purge_interval = (purge_secs > 0).then_some(Duration::from_secs(purge_secs));

        let image_interest_limit = env_parse("SHARECARD_IMAGE_INTEREST_LIMIT", 5)?;
        let page_interest_limit = env_parse("SHARECARD_PAGE_INTEREST_LIMIT", 8)?;

        let metrics_port = std::env::var("SHARECARD_METRICS_PORT")
            .ok()
            .map(|v| v.trim().parse::<u16>())
            .transpose()
            .context("SHARECARD_METRICS_PORT must be a port number")?;

        tracing::info!(
            bind_addr = %bind_addr,
            base_url = %base_url,
            site_name = %site_name,
            store = ?store,
            share_ttl_secs = share_ttl.as_secs(),
            purge_interval_secs = purge_secs,
            image_interest_limit,
            page_interest_limit,
            metrics_port = ?metrics_port,
            "sharecard configuration loaded"
        );

        Ok(Self {
            bind_addr,
            base_url,
            site_name,
            cta_url,
            store,
            share_ttl,
            purge_interval,
            image_interest_limit,
            page_interest_limit,
            metrics_port,
        })
    }

    /// Public URL of a share link.
    pub fn share_url(&self, token: &str) -> String {
        format!("{}/s/{token}", self.base_url)
    }

    /// Host part of the base URL, shown in card footers.
    pub fn public_host(&self) -> &str {
        let without_scheme = self
            .base_url
            .split_once("://")
            .map_or(self.base_url.as_str(), |(_, rest)| rest);
        without_scheme.split('/').next().unwrap_or(without_scheme)
    }
}

/// Pick the public base URL from an ordered list of candidates.
///
/// 1. `SHARECARD_BASE_URL`: a full URL, used as is
/// 2. `SHARECARD_PRODUCTION_HOST`: a bare host, served over https
/// 3. `SHARECARD_DEPLOYMENT_HOST`: a bare host, served over https
/// 4. `http://localhost:8081`
///
/// Blank values are skipped. Trailing slashes are removed.
pub fn resolve_base_url<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let url = non_blank("SHARECARD_BASE_URL")
        .map(|v| v.trim().to_string())
        .or_else(|| non_blank("SHARECARD_PRODUCTION_HOST").map(|h| format!("https://{}", h.trim())))
        .or_else(|| non_blank("SHARECARD_DEPLOYMENT_HOST").map(|h| format!("https://{}", h.trim())))
        .unwrap_or_else(|| FALLBACK_BASE_URL.to_string());

    url.trim_end_matches('/').to_string()
}

/// Parse an optional numeric environment variable.
fn env_parse<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got '{v}'")),
        _ => Ok(default),
    }
}
