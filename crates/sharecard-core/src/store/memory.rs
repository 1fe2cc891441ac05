//! Non-durable share store for development and tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{ShareRecord, ShareStore, StoreError, store_key};
use crate::clock::Clock;
use crate::snapshot::ProfileSnapshot;

/// In-process [`ShareStore`]. Contents are lost on restart.
pub struct MemoryStore {
    records: RwLock<HashMap<String, ShareRecord>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of records held, expired ones included.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl ShareStore for MemoryStore {
    async fn put(
        &self,
        token: &str,
        snapshot: &ProfileSnapshot,
        ttl: Duration,
    ) -> Result<ShareRecord, StoreError> {
        let record = ShareRecord::new(token, snapshot.clone(), self.clock.now(), ttl);
        self.records
            .write()
            .insert(store_key(token), record.clone());
        Ok(record)
    }

    async fn get(&self, token: &str) -> Result<Option<ShareRecord>, StoreError> {
        let now = self.clock.now();
        Ok(self
            .records
            .read()
            .get(&store_key(token))
            .filter(|r| r.is_live_at(now))
            .cloned())
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let now = self.clock.now();
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|_, r| r.is_live_at(now));
        Ok((before - records.len()) as u64)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SHARE_TTL;
    use crate::clock::ManualClock;

    fn store() -> (MemoryStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (MemoryStore::new(clock.clone()), clock)
    }

    #[tokio::test]
    async fn round_trip() {
        let (store, _) = store();
        let snap = ProfileSnapshot::new("0xabc");
        store.put("abc123", &snap, SHARE_TTL).await.unwrap();

        let read = store.get("abc123").await.unwrap().unwrap();
        assert_eq!(read.token, "abc123");
        assert_eq!(read.snapshot, snap);
    }

    #[tokio::test]
    async fn expiry_hides_record() {
        let (store, clock) = store();
        store
            .put("abc123", &ProfileSnapshot::new("w"), SHARE_TTL)
            .await
            .unwrap();

        clock.advance(SHARE_TTL);
        assert!(store.get("abc123").await.unwrap().is_none());
        // Still held until purged
        assert_eq!(store.len(), 1);

        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn overwrite_replaces() {
        let (store, _) = store();
        store
            .put("abc123", &ProfileSnapshot::new("first"), SHARE_TTL)
            .await
            .unwrap();
        store
            .put("abc123", &ProfileSnapshot::new("second"), SHARE_TTL)
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        let read = store.get("abc123").await.unwrap().unwrap();
        assert_eq!(read.snapshot.wallet, "second");
    }

    #[tokio::test]
    async fn never_written_is_none() {
        let (store, _) = store();
        assert!(store.get("abc123").await.unwrap().is_none());
        assert_eq!(store.backend(), "memory");
    }
}
