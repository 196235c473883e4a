pub mod api;
pub mod blockchain;
pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod notification;
pub mod service;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience
pub use api::error::ApiError;
pub use api::response::ApiResponse;
pub use api::route::create_router;
pub use blockchain::{DepositMonitor, DepositProcessor, TransactionClassifier, TronGridClient};
pub use db::connection;
pub use models::{DepositEvent, TransferBatch, TransferKind, Wallet};
pub use notification::{NotificationDispatcher, NotificationPort, TelegramNotifier};
pub use service::{DedupStore, SqliteDedupStore, SqliteWalletRegistry, WalletRegistry};
pub use validation::validate_tron_address;
