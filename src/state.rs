use crate::service::WalletRegistry;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct AppState {
    pub db_pool: SqlitePool,
    pub registry: Arc<dyn WalletRegistry>,
}
