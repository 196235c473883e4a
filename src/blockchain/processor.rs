use crate::blockchain::classifier::TransactionClassifier;
use crate::blockchain::client::TransactionFetcher;
use crate::models::{DepositEvent, Wallet};
use crate::notification::NotificationDispatcher;
use crate::service::{DedupStore, MarkOutcome};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// What happened to a single deposit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Notified,
    AlreadyNotified,
    /// The id could not be confirmed as newly recorded; nothing was sent.
    DedupFailed,
    /// Recorded as processed but the message did not go out.
    SendFailed,
}

/// Per-wallet counters for one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletReport {
    pub fetched: usize,
    pub deposits: usize,
    pub notified: usize,
    pub already_notified: usize,
    pub dedup_failed: usize,
    pub send_failed: usize,
}

impl WalletReport {
    fn record(&mut self, outcome: EventOutcome) {
        match outcome {
            EventOutcome::Notified => self.notified += 1,
            EventOutcome::AlreadyNotified => self.already_notified += 1,
            EventOutcome::DedupFailed => self.dedup_failed += 1,
            EventOutcome::SendFailed => self.send_failed += 1,
        }
    }
}

/// Fetch → classify → dedup → dispatch for one wallet.
pub struct DepositProcessor {
    fetcher: Arc<dyn TransactionFetcher>,
    classifier: TransactionClassifier,
    dedup: Arc<dyn DedupStore>,
    dispatcher: NotificationDispatcher,
}

impl DepositProcessor {
    pub fn new(
        fetcher: Arc<dyn TransactionFetcher>,
        classifier: TransactionClassifier,
        dedup: Arc<dyn DedupStore>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            dedup,
            dispatcher,
        }
    }

    pub async fn process_wallet(&self, wallet: &Wallet) -> WalletReport {
        let batch = self
            .fetcher
            .fetch_recent(&wallet.native_address, &wallet.token_address)
            .await;

        let events = self.classifier.classify(wallet, &batch);

        let mut report = WalletReport {
            fetched: batch.len(),
            deposits: events.len(),
            ..Default::default()
        };

        // Newest first, one at a time so the chat sees them in that order
        for event in &events {
            let outcome = self.handle_event(wallet, event).await;
            report.record(outcome);
        }

        if report.notified > 0 {
            info!(
                "Notified {} new deposit(s) to chat {}",
                report.notified, wallet.chat_id
            );
        }

        report
    }

    async fn handle_event(&self, wallet: &Wallet, event: &DepositEvent) -> EventOutcome {
        match self.dedup.seen(&event.transaction_id).await {
            Ok(true) => return EventOutcome::AlreadyNotified,
            Ok(false) => {}
            Err(e) => {
                warn!(
                    "Could not check transaction {}: {}",
                    event.transaction_id, e
                );
                return EventOutcome::DedupFailed;
            }
        }

        match self.dedup.mark_seen(&event.transaction_id, event.kind).await {
            Ok(MarkOutcome::Inserted) => {}
            Ok(MarkOutcome::AlreadyPresent) => {
                debug!(
                    "Transaction {} was claimed concurrently, skipping",
                    event.transaction_id
                );
                return EventOutcome::AlreadyNotified;
            }
            Err(e) => {
                error!(
                    "Failed to record transaction {}, not notifying: {}",
                    event.transaction_id, e
                );
                return EventOutcome::DedupFailed;
            }
        }

        match self.dispatcher.dispatch(wallet.chat_id, event).await {
            Ok(()) => EventOutcome::Notified,
            Err(e) => {
                error!(
                    "Failed to notify chat {} about {}: {}",
                    wallet.chat_id, event.transaction_id, e
                );
                EventOutcome::SendFailed
            }
        }
    }
}
