//! Share token resolution.
//!
//! Turns a public token into one of three outcomes. Malformed tokens never
//! reach the store; a store failure stays distinct from "not found" so the
//! caller can answer "try again".

use sharecard_core::metrics::{LookupOutcome, record_lookup};
use sharecard_core::{ShareRecord, ShareStore, StoreError, is_valid_token};

use crate::error::{ApiError, CardError};

/// Outcome of looking up a share token.
#[derive(Debug)]
pub enum Resolution {
    /// A live record exists.
    Resolved(ShareRecord),
    /// Never written, expired, or not a token at all.
    NotFound,
    /// The store could not answer.
    StoreError(StoreError),
}

impl Resolution {
    fn outcome(&self) -> LookupOutcome {
        match self {
            Self::Resolved(_) => LookupOutcome::Resolved,
            Self::NotFound => LookupOutcome::NotFound,
            Self::StoreError(_) => LookupOutcome::StoreError,
        }
    }

    /// Map to the page error taxonomy.
    pub fn into_page_result(self, token: &str) -> Result<ShareRecord, CardError> {
        match self {
            Self::Resolved(record) => Ok(record),
            Self::NotFound => Err(CardError::NotFound(format!("share {token}"))),
            Self::StoreError(e) => Err(CardError::Store(e)),
        }
    }

    /// Map to the JSON API error taxonomy.
    pub fn into_api_result(self, token: &str) -> Result<ShareRecord, ApiError> {
        match self {
            Self::Resolved(record) => Ok(record),
            Self::NotFound => Err(ApiError::NotFound(format!("share {token}"))),
            Self::StoreError(e) => Err(ApiError::Unavailable(e)),
        }
    }
}

/// Look up a token. Performs at most one store read.
pub async fn resolve_share(store: &dyn ShareStore, token: &str) -> Resolution {
    let resolution = if !is_valid_token(token) {
        tracing::debug!(token = %token, "malformed share token");
        Resolution::NotFound
    } else {
        match store.get(token).await {
            Ok(Some(record)) => Resolution::Resolved(record),
            Ok(None) => Resolution::NotFound,
            Err(e) => {
                tracing::warn!(token = %token, backend = store.backend(), error = %e, "share lookup failed");
                Resolution::StoreError(e)
            }
        }
    };

    record_lookup(resolution.outcome());
    tracing::debug!(token = %token, outcome = resolution.outcome().as_str(), "share resolved");
    resolution
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::testing::*;
    use super::*;
    use sharecard_core::{ManualClock, MemoryStore, ProfileSnapshot, SHARE_TTL};

    fn memory() -> (CountingStore<MemoryStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (CountingStore::new(MemoryStore::new(clock.clone())), clock)
    }

    #[tokio::test]
    async fn resolves_live_record() {
        let (store, _) = memory();
        store
            .put("abc123", &ProfileSnapshot::new("0xabc"), SHARE_TTL)
            .await
            .unwrap();

        match resolve_share(&store, "abc123").await {
            Resolution::Resolved(record) => assert_eq!(record.snapshot.wallet, "0xabc"),
            other => panic!("expected resolved, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let (store, _) = memory();
        assert!(matches!(
            resolve_share(&store, "zzzzzz").await,
            Resolution::NotFound
        ));
        assert_eq!(store.gets(), 1);
    }

    #[tokio::test]
    async fn malformed_token_skips_store() {
        let (store, _) = memory();
        for token in ["", "ABC123", "abc", "abc1234", "abc-12", "../etc"] {
            assert!(matches!(
                resolve_share(&store, token).await,
                Resolution::NotFound
            ));
        }
        assert_eq!(store.gets(), 0);
    }

    #[tokio::test]
    async fn expired_record_is_not_found() {
        let (store, clock) = memory();
        store
            .put("abc123", &ProfileSnapshot::new("0xabc"), SHARE_TTL)
            .await
            .unwrap();
        clock.advance(SHARE_TTL);

        assert!(matches!(
            resolve_share(&store, "abc123").await,
            Resolution::NotFound
        ));
    }

    #[tokio::test]
    async fn store_failure_is_distinct() {
        let resolution = resolve_share(&FailingStore, "abc123").await;
        assert!(matches!(resolution, Resolution::StoreError(_)));
        assert!(matches!(
            resolution.into_page_result("abc123"),
            Err(CardError::Store(_))
        ));
    }

    #[test]
    fn not_found_maps_per_surface() {
        assert!(matches!(
            Resolution::NotFound.into_page_result("abc123"),
            Err(CardError::NotFound(_))
        ));
        assert!(matches!(
            Resolution::NotFound.into_api_result("abc123"),
            Err(ApiError::NotFound(_))
        ));
    }
}
