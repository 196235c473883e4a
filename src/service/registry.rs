use crate::db::{wallet, DbError};
use crate::models::Wallet;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Registered(Wallet),
    ChatAlreadyRegistered,
    AddressInUse,
}

/// Registration and lookup of watched wallets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletRegistry: Send + Sync {
    async fn list_wallets(&self) -> Result<Vec<Wallet>, DbError>;

    async fn find_by_chat(&self, chat_id: i64) -> Result<Option<Wallet>, DbError>;

    /// Register `address` for both native and token watching.
    async fn register(&self, chat_id: i64, address: &str) -> Result<Registration, DbError>;
}

#[derive(Clone)]
pub struct SqliteWalletRegistry {
    pool: SqlitePool,
}

impl SqliteWalletRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WalletRegistry for SqliteWalletRegistry {
    async fn list_wallets(&self) -> Result<Vec<Wallet>, DbError> {
        Ok(wallet::get_all_wallets(&self.pool).await?)
    }

    async fn find_by_chat(&self, chat_id: i64) -> Result<Option<Wallet>, DbError> {
        Ok(wallet::get_wallet_by_chat(&self.pool, chat_id).await?)
    }

    async fn register(&self, chat_id: i64, address: &str) -> Result<Registration, DbError> {
        if wallet::get_wallet_by_chat(&self.pool, chat_id).await?.is_some() {
            return Ok(Registration::ChatAlreadyRegistered);
        }
        if wallet::is_address_registered(&self.pool, address).await? {
            return Ok(Registration::AddressInUse);
        }

        let new_wallet = Wallet {
            chat_id,
            native_address: address.to_string(),
            token_address: address.to_string(),
        };

        // Lost a race with a concurrent registration; report which side won
        if !wallet::add_wallet(&self.pool, &new_wallet).await? {
            return Ok(
                if wallet::get_wallet_by_chat(&self.pool, chat_id).await?.is_some() {
                    Registration::ChatAlreadyRegistered
                } else {
                    Registration::AddressInUse
                },
            );
        }

        info!("Registered wallet {} for chat {}", address, chat_id);
        Ok(Registration::Registered(new_wallet))
    }
}
