#[cfg(test)]
mod tests {
    use crate::{
        blockchain::{CycleSummary, DepositMonitor, SchedulerState, TransactionFetcher},
        db::DbError,
        models::TransferBatch,
        service::{registry::MockWalletRegistry, SqliteWalletRegistry, WalletRegistry},
        tests::fixtures::*,
    };
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio_util::sync::CancellationToken;

    const INTERVAL: Duration = Duration::from_secs(30);

    /// Blocks inside the fetch until released.
    #[derive(Default)]
    struct GatedFetcher {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl TransactionFetcher for GatedFetcher {
        async fn fetch_recent(&self, _native: &str, _token: &str) -> TransferBatch {
            self.entered.notify_one();
            self.release.notified().await;
            TransferBatch::default()
        }
    }

    /// Panics for one address and serves a deposit to the others.
    struct PanickingFetcher {
        poisoned: &'static str,
    }

    #[async_trait]
    impl TransactionFetcher for PanickingFetcher {
        async fn fetch_recent(&self, native: &str, _token: &str) -> TransferBatch {
            if native == self.poisoned {
                panic!("upstream returned garbage");
            }
            native_batch(vec![native_transfer("ok", WALLET_A_HEX, 1_000_000, Some(1))])
        }
    }

    fn static_registry(wallets: Vec<crate::models::Wallet>) -> Arc<MockWalletRegistry> {
        let mut registry = MockWalletRegistry::new();
        registry
            .expect_list_wallets()
            .returning(move || Ok(wallets.clone()));
        Arc::new(registry)
    }

    #[tokio::test]
    async fn test_cycle_delivers_to_each_wallet_only() {
        let pool = memory_pool().await;
        let registry = Arc::new(SqliteWalletRegistry::new(pool.clone()));
        registry.register(CHAT_A, WALLET_A).await.unwrap();
        registry.register(CHAT_B, WALLET_B).await.unwrap();

        let fetcher = Arc::new(
            StaticFetcher::default()
                .with(
                    WALLET_A,
                    native_batch(vec![native_transfer("to-a", WALLET_A_HEX, 1_000_000, Some(1))]),
                )
                .with(
                    WALLET_B,
                    native_batch(vec![
                        native_transfer("to-b", WALLET_B_HEX, 2_000_000, Some(2)),
                        // Outgoing history of B paying A
                        native_transfer("b-pays-a", WALLET_A_HEX, 3_000_000, Some(3)),
                    ]),
                ),
        );
        let notifier = Arc::new(RecordingNotifier::default());
        let processor = Arc::new(processor(fetcher.clone(), dedup_store(&pool), notifier.clone()));
        let monitor = DepositMonitor::new(registry, processor, INTERVAL);

        let summary = monitor.run_cycle().await;

        assert_eq!(
            summary,
            CycleSummary {
                wallets: 2,
                processed: 2,
                notified: 2,
                ..Default::default()
            }
        );
        assert_eq!(fetcher.calls(), 2);

        let to_a = notifier.sent_to(CHAT_A);
        assert_eq!(to_a.len(), 1);
        assert!(to_a[0].contains("Transaction: to-a"));

        let to_b = notifier.sent_to(CHAT_B);
        assert_eq!(to_b.len(), 1);
        assert!(to_b[0].contains("Transaction: to-b"));
        assert!(to_b[0].contains("Amount: 2 TRX"));
    }

    #[tokio::test]
    async fn test_registry_failure_skips_cycle() {
        let mut registry = MockWalletRegistry::new();
        registry
            .expect_list_wallets()
            .times(1)
            .returning(|| Err(DbError::Sqlx(sqlx::Error::PoolClosed)));

        let pool = memory_pool().await;
        let fetcher = Arc::new(StaticFetcher::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let processor = Arc::new(processor(fetcher.clone(), dedup_store(&pool), notifier));
        let monitor = DepositMonitor::new(Arc::new(registry), processor, INTERVAL);

        assert_eq!(monitor.run_cycle().await, CycleSummary::default());
        assert_eq!(fetcher.calls(), 0);
        assert_eq!(monitor.state(), SchedulerState::Idle);
    }

    #[tokio::test]
    async fn test_failing_wallet_does_not_abort_cycle() {
        let pool = memory_pool().await;
        let notifier = Arc::new(RecordingNotifier::default());
        let processor = Arc::new(processor(
            Arc::new(PanickingFetcher { poisoned: WALLET_B }),
            dedup_store(&pool),
            notifier.clone(),
        ));
        let registry = static_registry(vec![wallet(CHAT_A, WALLET_A), wallet(CHAT_B, WALLET_B)]);
        let monitor = DepositMonitor::new(registry, processor, INTERVAL);

        let summary = monitor.run_cycle().await;

        assert_eq!(summary.wallets, 2);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(notifier.sent_to(CHAT_A).len(), 1);
        assert!(notifier.sent_to(CHAT_B).is_empty());

        // The poisoned wallet's guard was released by the unwinding task
        let again = monitor.run_cycle().await;
        assert_eq!(again.skipped_in_flight, 0);
        assert_eq!(again.failed, 1);
    }

    #[tokio::test]
    async fn test_wallet_in_flight_is_skipped() {
        let pool = memory_pool().await;
        let fetcher = Arc::new(GatedFetcher::default());
        let processor = Arc::new(processor(
            fetcher.clone(),
            dedup_store(&pool),
            Arc::new(RecordingNotifier::default()),
        ));
        let registry = static_registry(vec![wallet(CHAT_A, WALLET_A)]);
        let monitor = Arc::new(DepositMonitor::new(registry, processor, INTERVAL));
        assert_eq!(monitor.state(), SchedulerState::Idle);

        let slow = {
            let monitor = monitor.clone();
            tokio::spawn(async move { monitor.run_cycle().await })
        };
        fetcher.entered.notified().await;
        assert_eq!(monitor.state(), SchedulerState::CycleRunning);

        let overlapping = monitor.run_cycle().await;
        assert_eq!(overlapping.wallets, 1);
        assert_eq!(overlapping.skipped_in_flight, 1);
        assert_eq!(overlapping.processed, 0);

        fetcher.release.notify_one();
        let finished = slow.await.unwrap();
        assert_eq!(finished.processed, 1);
        assert_eq!(monitor.state(), SchedulerState::Idle);
    }

    #[tokio::test]
    async fn test_polling_runs_until_cancelled() {
        let pool = memory_pool().await;
        let notifier = Arc::new(RecordingNotifier::default());
        let fetcher = Arc::new(StaticFetcher::default().with(
            WALLET_A,
            native_batch(vec![native_transfer("polled", WALLET_A_HEX, 1_000_000, Some(1))]),
        ));
        let processor = Arc::new(processor(fetcher, dedup_store(&pool), notifier.clone()));
        let registry = static_registry(vec![wallet(CHAT_A, WALLET_A)]);
        let monitor = Arc::new(DepositMonitor::new(
            registry,
            processor,
            Duration::from_millis(10),
        ));

        let shutdown = CancellationToken::new();
        let polling = tokio::spawn(monitor.clone().start_polling(shutdown.clone()));

        // First tick fires immediately
        tokio::time::timeout(Duration::from_secs(5), async {
            while notifier.sent().is_empty() {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .expect("no notification within timeout");

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), polling)
            .await
            .expect("polling did not stop")
            .unwrap();

        assert_eq!(notifier.sent_to(CHAT_A).len(), 1);
    }
}
