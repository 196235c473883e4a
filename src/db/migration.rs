use sqlx::SqlitePool;
use tracing::info;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Running database migrations...");

    // One wallet per chat; an address can belong to a single chat
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS wallets (
            chat_id INTEGER PRIMARY KEY,
            wallet_address_trx TEXT NOT NULL UNIQUE,
            wallet_address_usdt TEXT NOT NULL,
            created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        )",
    )
    .execute(pool)
    .await?;

    // Existence of a row means the transaction was already notified
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS processed_transactions (
            transaction_id TEXT PRIMARY KEY,
            kind TEXT,
            processed_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_wallets_usdt_address
         ON wallets(wallet_address_usdt)",
    )
    .execute(pool)
    .await?;

    info!("Database migrations completed successfully");
    Ok(())
}
