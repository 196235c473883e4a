pub mod address;
pub mod classifier;
pub mod client;
pub mod models;
pub mod polling;
pub mod processor;

// Re-exports for convenience
pub use classifier::TransactionClassifier;
pub use client::{TransactionFetcher, TronGridClient};
pub use polling::{CycleSummary, DepositMonitor, SchedulerState};
pub use processor::{DepositProcessor, WalletReport};
