//! Application state shared across all request handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sharecard_core::metrics::{self as m, increment};
use sharecard_core::{MemoryStore, ShareStore, SqliteStore, SystemClock};
use tokio::task::JoinHandle;

use crate::config::{Config, StoreBackend};

/// Type alias for the OG image cache (canonical query string -> PNG bytes).
pub type OgImageCache = Cache<String, Vec<u8>>;

/// OG image cache capacity.
/// Each card is ~30-60KB PNG, so 5K entries ~= 150-300MB.
const OG_CACHE_CAPACITY: u64 = 5_000;

/// OG image cache TTL. Images are a pure function of their parameters, so
/// this only bounds memory residency.
const OG_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Share record store.
    pub store: Arc<dyn ShareStore>,

    /// Application configuration.
    pub config: Arc<Config>,

    /// In-memory OG image cache keyed by canonical card parameters.
    pub og_cache: OgImageCache,
}

impl AppState {
    /// Create application state, opening the configured store.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let clock = Arc::new(SystemClock);
        let store: Arc<dyn ShareStore> = match &config.store {
            StoreBackend::Sqlite(path) => Arc::new(SqliteStore::open(path, clock)?),
            StoreBackend::Memory => {
                tracing::warn!("using in-memory share store; links will not survive a restart");
                Arc::new(MemoryStore::new(clock))
            }
        };

        Ok(Self::with_store(config, store))
    }

    /// Create application state around an existing store.
    pub fn with_store(config: Config, store: Arc<dyn ShareStore>) -> Self {
        let og_cache = Cache::builder()
            .max_capacity(OG_CACHE_CAPACITY)
            .time_to_live(OG_CACHE_TTL)
            .build();

        tracing::info!(
            store = store.backend(),
            og_cache_capacity = OG_CACHE_CAPACITY,
            og_cache_ttl_secs = OG_CACHE_TTL.as_secs(),
            "application state initialized"
        );

        Self {
            store,
            config: Arc::new(config),
            og_cache,
        }
    }

    /// Spawn the periodic expired-record purge, if enabled.
    ///
    /// Failures are logged and retried on the next tick.
    pub fn spawn_purge_task(&self) -> Option<JoinHandle<()>> {
        let every = self.config.purge_interval?;
        let store = Arc::clone(&self.store);

        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                match store.purge_expired().await {
                    Ok(0) => tracing::debug!("no expired share records"),
                    Ok(removed) => {
                        increment(m::RECORDS_PURGED, removed);
                        tracing::info!(removed, "purged expired share records");
                    }
                    Err(e) => tracing::warn!(error = %e, "failed to purge expired share records"),
                }
            }
        }))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use sharecard_core::{ManualClock, ProfileSnapshot};

    #[tokio::test]
    async fn new_opens_configured_sqlite_store() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(sqlite_config(dir.path().join("db").join("s.db"))).unwrap();
        assert_eq!(state.store.backend(), "sqlite");
        assert!(dir.path().join("db").join("s.db").exists());
    }

    #[tokio::test]
    async fn new_opens_memory_store() {
        let state = AppState::new(test_config()).unwrap();
        assert_eq!(state.store.backend(), "memory");
    }

    #[tokio::test]
    async fn purge_task_disabled_without_interval() {
        let state = AppState::new(test_config()).unwrap();
        assert!(state.spawn_purge_task().is_none());
    }

    #[tokio::test]
    async fn purge_task_removes_expired_records() {
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(MemoryStore::new(clock.clone()));
        store
            .put("abc123", &ProfileSnapshot::new("w"), Duration::from_secs(5))
            .await
            .unwrap();
        clock.advance(Duration::from_secs(10));

        let config = Config {
            purge_interval: Some(Duration::from_millis(10)),
            ..test_config()
        };
        let state = AppState::with_store(config, store.clone());
        let handle = state.spawn_purge_task().unwrap();

        for _ in 0..100 {
            if store.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();
        assert!(store.is_empty());
    }
}
