//! Storage-backed collaborators consumed by the deposit pipeline.

pub mod dedup;
pub mod registry;

pub use dedup::{DedupStore, MarkOutcome, SqliteDedupStore};
pub use registry::{Registration, SqliteWalletRegistry, WalletRegistry};
