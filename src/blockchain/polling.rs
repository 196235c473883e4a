use crate::blockchain::processor::{DepositProcessor, WalletReport};
use crate::service::WalletRegistry;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    CycleRunning,
}

/// Counters for one polling cycle across all wallets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub wallets: usize,
    pub processed: usize,
    pub skipped_in_flight: usize,
    pub failed: usize,
    pub notified: usize,
}

/// Chat ids whose wallet is currently being processed.
#[derive(Clone, Default)]
struct InFlight {
    wallets: Arc<Mutex<HashSet<i64>>>,
}

impl InFlight {
    fn try_acquire(&self, chat_id: i64) -> Option<InFlightGuard> {
        let mut wallets = self.wallets.lock().unwrap_or_else(PoisonError::into_inner);
        if wallets.insert(chat_id) {
            Some(InFlightGuard {
                wallets: self.wallets.clone(),
                chat_id,
            })
        } else {
            None
        }
    }
}

struct InFlightGuard {
    wallets: Arc<Mutex<HashSet<i64>>>,
    chat_id: i64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.wallets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.chat_id);
    }
}

struct CycleGuard(Arc<AtomicUsize>);

impl CycleGuard {
    fn enter(active: &Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        Self(active.clone())
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Periodically runs the deposit pipeline for every registered wallet.
pub struct DepositMonitor {
    registry: Arc<dyn WalletRegistry>,
    processor: Arc<DepositProcessor>,
    in_flight: InFlight,
    active_cycles: Arc<AtomicUsize>,
    polling_interval: Duration,
}

impl DepositMonitor {
    pub fn new(
        registry: Arc<dyn WalletRegistry>,
        processor: Arc<DepositProcessor>,
        polling_interval: Duration,
    ) -> Self {
        Self {
            registry,
            processor,
            in_flight: InFlight::default(),
            active_cycles: Arc::new(AtomicUsize::new(0)),
            // tokio's interval panics on a zero period
            polling_interval: polling_interval.max(Duration::from_secs(1)),
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.active_cycles.load(Ordering::SeqCst) == 0 {
            SchedulerState::Idle
        } else {
            SchedulerState::CycleRunning
        }
    }

    /// Process every registered wallet concurrently and wait for all of them.
    pub async fn run_cycle(&self) -> CycleSummary {
        let _cycle = CycleGuard::enter(&self.active_cycles);

        let wallets = match self.registry.list_wallets().await {
            Ok(wallets) => wallets,
            Err(e) => {
                error!("Failed to load registered wallets: {}", e);
                return CycleSummary::default();
            }
        };

        let mut summary = CycleSummary {
            wallets: wallets.len(),
            ..Default::default()
        };
        if wallets.is_empty() {
            return summary;
        }

        let mut chat_ids = Vec::with_capacity(wallets.len());
        let mut tasks = Vec::with_capacity(wallets.len());

        for wallet in wallets {
            let Some(guard) = self.in_flight.try_acquire(wallet.chat_id) else {
                debug!(
                    "Previous cycle still processing chat {}, skipping",
                    wallet.chat_id
                );
                summary.skipped_in_flight += 1;
                continue;
            };

            let processor = self.processor.clone();
            chat_ids.push(wallet.chat_id);
            tasks.push(tokio::spawn(async move {
                let _guard = guard;
                processor.process_wallet(&wallet).await
            }));
        }

        for (chat_id, result) in chat_ids.into_iter().zip(join_all(tasks).await) {
            match result {
                Ok(WalletReport { notified, .. }) => {
                    summary.processed += 1;
                    summary.notified += notified;
                }
                Err(e) => {
                    error!("Wallet task for chat {} failed: {}", chat_id, e);
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    pub async fn start_polling(self: Arc<Self>, shutdown: CancellationToken) {
        info!(
            "Starting deposit polling service, interval {:?}",
            self.polling_interval
        );

        let mut ticker = interval(self.polling_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // A slow cycle must not hold back the next tick
                    let monitor = self.clone();
                    tokio::spawn(async move {
                        let summary = monitor.run_cycle().await;
                        debug!(
                            "Cycle finished: {} wallets, {} processed, {} skipped, {} failed, {} notified",
                            summary.wallets,
                            summary.processed,
                            summary.skipped_in_flight,
                            summary.failed,
                            summary.notified
                        );
                    });
                }
                _ = shutdown.cancelled() => {
                    info!("Shutting down deposit polling service");
                    break;
                }
            }
        }
    }
}
