//! In-process cache of transaction ids already recorded as notified

use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

/// Positive-only cache in front of `processed_transactions`.
///
/// Entries are only ever added after the database confirmed the row exists,
/// so a miss just means "ask the database".
#[derive(Clone)]
pub struct ProcessedCache {
    cache: Cache<String, ()>,
}

impl ProcessedCache {
    /// Create a new processed-id cache
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    /// Check if a transaction id is known to be processed
    pub async fn contains(&self, transaction_id: &str) -> bool {
        self.cache.get(transaction_id).await.is_some()
    }

    /// Remember a transaction id the database has confirmed
    pub async fn insert(&self, transaction_id: &str) {
        self.cache.insert(transaction_id.to_string(), ()).await;
        debug!("Cached processed transaction: {}", transaction_id);
    }
}
