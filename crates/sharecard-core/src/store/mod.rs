//! Share record storage.
//!
//! A store maps a token to a [`ShareRecord`] that expires a fixed time after
//! it was written. The contract every backend follows:
//!
//! - `put` always writes, replacing whatever was stored under the token.
//! - `get` returns `Ok(None)` for a token that was never written and for one
//!   whose record has expired; callers cannot tell the two apart.
//! - Backend failures are `Err(StoreError)`, never `Ok(None)`, so a caller can
//!   answer "try again" instead of "not found".
//!
//! Records are only ever removed by expiry. [`ShareStore::purge_expired`]
//! reclaims space but lookups never depend on it having run.

mod memory;
mod schema;
mod sqlite;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::snapshot::ProfileSnapshot;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Prefix applied to every token to form the storage key.
pub const KEY_PREFIX: &str = "profile:";

/// Storage key for a token.
pub fn store_key(token: &str) -> String {
    format!("{KEY_PREFIX}{token}")
}

/// A stored snapshot with its public token and lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRecord {
    /// Public lookup token (without the key prefix).
    pub token: String,
    #[serde(flatten)]
    pub snapshot: ProfileSnapshot,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ShareRecord {
    /// Build a record written at `now` that lives for `ttl`.
    pub fn new(token: &str, snapshot: ProfileSnapshot, now: DateTime<Utc>, ttl: Duration) -> Self {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            token: token.to_string(),
            snapshot,
            created_at: now,
            expires_at,
        }
    }

    /// Whether the record is still visible at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Store backend failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Stored snapshot could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row holds values that cannot be decoded.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// The blocking worker running the query failed.
    #[error("store task failed: {0}")]
    Task(String),

    /// I/O error (e.g. creating the database directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key-value persistence for share records with per-record expiry.
#[async_trait]
pub trait ShareStore: Send + Sync {
    /// Write `snapshot` under `token`, replacing any existing record.
    ///
    /// The record expires `ttl` after the store's current time.
    async fn put(
        &self,
        token: &str,
        snapshot: &ProfileSnapshot,
        ttl: Duration,
    ) -> Result<ShareRecord, StoreError>;

    /// Read the live record for `token`.
    ///
    /// Returns:
    /// - `Ok(Some(record))`: present and not expired
    /// - `Ok(None)`: never written, or expired
    /// - `Err(_)`: the backend could not answer
    async fn get(&self, token: &str) -> Result<Option<ShareRecord>, StoreError>;

    /// Remove expired records, returning how many were removed.
    async fn purge_expired(&self) -> Result<u64, StoreError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
