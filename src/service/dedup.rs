use crate::cache::ProcessedCache;
use crate::db::{processed, DbError};
use crate::models::TransferKind;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// This call recorded the id; the caller owns the notification.
    Inserted,
    /// Someone else recorded it first.
    AlreadyPresent,
}

/// Persisted set of transaction ids that have been notified.
///
/// `mark_seen` must be an atomic insert-if-absent: it is the only guard
/// against two concurrent tasks notifying the same transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DedupStore: Send + Sync {
    async fn seen(&self, transaction_id: &str) -> Result<bool, DbError>;

    async fn mark_seen(
        &self,
        transaction_id: &str,
        kind: TransferKind,
    ) -> Result<MarkOutcome, DbError>;
}

#[derive(Clone)]
pub struct SqliteDedupStore {
    pool: SqlitePool,
    cache: ProcessedCache,
}

impl SqliteDedupStore {
    pub fn new(pool: SqlitePool, cache: ProcessedCache) -> Self {
        Self { pool, cache }
    }
}

#[async_trait]
impl DedupStore for SqliteDedupStore {
    async fn seen(&self, transaction_id: &str) -> Result<bool, DbError> {
        if self.cache.contains(transaction_id).await {
            return Ok(true);
        }

        let seen = processed::is_processed(&self.pool, transaction_id).await?;
        if seen {
            self.cache.insert(transaction_id).await;
        }
        Ok(seen)
    }

    async fn mark_seen(
        &self,
        transaction_id: &str,
        kind: TransferKind,
    ) -> Result<MarkOutcome, DbError> {
        let inserted =
            processed::insert_if_absent(&self.pool, transaction_id, Some(kind.as_str())).await?;
        self.cache.insert(transaction_id).await;

        if inserted {
            Ok(MarkOutcome::Inserted)
        } else {
            debug!("Transaction {} was already recorded", transaction_id);
            Ok(MarkOutcome::AlreadyPresent)
        }
    }
}
