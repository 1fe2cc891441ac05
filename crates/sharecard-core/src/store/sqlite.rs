//! Durable share store backed by SQLite.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};

use super::{ShareRecord, ShareStore, StoreError, schema, store_key};
use crate::clock::Clock;
use crate::snapshot::ProfileSnapshot;

/// SQLite-backed [`ShareStore`].
///
/// Snapshots are stored as JSON next to their creation and expiry times.
/// Queries run on the blocking thread pool; the single connection is shared
/// behind a mutex.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    clock: Arc<dyn Clock>,
}

impl SqliteStore {
    /// Open or create a store at `path`.
    pub fn open(path: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        schema::init_schema(&conn)?;

        tracing::info!(path = %path.display(), "opened sqlite share store");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            clock,
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory(clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        schema::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            clock,
        })
    }

    /// Run a closure against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::Corrupt(format!("timestamp out of range: {ms}")))
}

#[async_trait]
impl ShareStore for SqliteStore {
    async fn put(
        &self,
        token: &str,
        snapshot: &ProfileSnapshot,
        ttl: Duration,
    ) -> Result<ShareRecord, StoreError> {
        let record = ShareRecord::new(token, snapshot.clone(), self.clock.now(), ttl);
        let key = store_key(token);
        let json = serde_json::to_string(&record.snapshot)?;
        let created_at = record.created_at.timestamp_millis();
        let expires_at = record.expires_at.timestamp_millis();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO share_records (key, snapshot, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(key) DO UPDATE SET
                    snapshot = excluded.snapshot,
                    created_at = excluded.created_at,
                    expires_at = excluded.expires_at",
                rusqlite::params![key, json, created_at, expires_at],
            )?;
            Ok(())
        })
        .await?;

        Ok(record)
    }

    async fn get(&self, token: &str) -> Result<Option<ShareRecord>, StoreError> {
        let key = store_key(token);
        let now = self.clock.now().timestamp_millis();

        let row = self
            .with_conn(move |conn| {
                let row = conn
                    .query_row(
                        "SELECT snapshot, created_at, expires_at FROM share_records
                         WHERE key = ?1 AND expires_at > ?2",
                        rusqlite::params![key, now],
                        |row| {
                            Ok((
                                row.get::<_, String>(0)?,
                                row.get::<_, i64>(1)?,
                                row.get::<_, i64>(2)?,
                            ))
                        },
                    )
                    .optional()?;
                Ok(row)
            })
            .await?;

        let Some((json, created_at, expires_at)) = row else {
            return Ok(None);
        };

        Ok(Some(ShareRecord {
            token: token.to_string(),
            snapshot: serde_json::from_str(&json)?,
            created_at: from_millis(created_at)?,
            expires_at: from_millis(expires_at)?,
        }))
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let now = self.clock.now().timestamp_millis();

        self.with_conn(move |conn| {
            let removed = conn.execute(
                "DELETE FROM share_records WHERE expires_at <= ?1",
                [now],
            )?;
            Ok(removed as u64)
        })
        .await
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SHARE_TTL;
    use crate::clock::ManualClock;
    use crate::interests::Interest;

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_704_067_200, 0).unwrap()
    }

    fn store() -> (SqliteStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let store = SqliteStore::open_in_memory(clock.clone()).unwrap();
        (store, clock)
    }

    fn snapshot() -> ProfileSnapshot {
        let mut snap = ProfileSnapshot::new("0x1234567890abcdef");
        snap.level = 5;
        snap.interests = vec![Interest::new("Art", 2)];
        snap
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let (store, _) = store();
        let written = store.put("abc123", &snapshot(), SHARE_TTL).await.unwrap();

        let read = store.get("abc123").await.unwrap().unwrap();
        assert_eq!(read, written);
        assert_eq!(read.snapshot, snapshot());
        assert_eq!(read.created_at, start());
    }

    #[tokio::test]
    async fn missing_token_is_none() {
        let (store, _) = store();
        assert!(store.get("zzzzzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_record_is_none() {
        let (store, clock) = store();
        store.put("abc123", &snapshot(), SHARE_TTL).await.unwrap();

        clock.advance(SHARE_TTL - Duration::from_secs(1));
        assert!(store.get("abc123").await.unwrap().is_some());

        clock.advance(Duration::from_secs(1));
        assert!(store.get("abc123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_overwrites_existing_token() {
        let (store, clock) = store();
        store.put("abc123", &snapshot(), SHARE_TTL).await.unwrap();

        clock.advance(Duration::from_secs(60));
        let other = ProfileSnapshot::new("0xother");
        store.put("abc123", &other, SHARE_TTL).await.unwrap();

        let read = store.get("abc123").await.unwrap().unwrap();
        assert_eq!(read.snapshot, other);
        assert_eq!(read.created_at, start() + chrono::Duration::seconds(60));
    }

    #[tokio::test]
    async fn purge_removes_only_expired() {
        let (store, clock) = store();
        store.put("old111", &snapshot(), Duration::from_secs(10)).await.unwrap();
        store.put("new222", &snapshot(), SHARE_TTL).await.unwrap();

        clock.advance(Duration::from_secs(11));
        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert_eq!(store.purge_expired().await.unwrap(), 0);
        assert!(store.get("new222").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_an_error_not_absence() {
        let (store, _) = store();
        {
            let conn = store.conn.lock();
            conn.execute(
                "INSERT INTO share_records (key, snapshot, created_at, expires_at)
                 VALUES ('profile:bad999', 'not json', 0, ?1)",
                [i64::MAX],
            )
            .unwrap();
        }

        let result = store.get("bad999").await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn survives_reopen_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("shares.db");
        let clock = Arc::new(ManualClock::new(start()));

        {
            let store = SqliteStore::open(&path, clock.clone()).unwrap();
            store.put("abc123", &snapshot(), SHARE_TTL).await.unwrap();
        }

        let store = SqliteStore::open(&path, clock).unwrap();
        let read = store.get("abc123").await.unwrap().unwrap();
        assert_eq!(read.snapshot.level, 5);
        assert_eq!(store.backend(), "sqlite");
    }
}
