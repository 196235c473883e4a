use crate::models::Wallet;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

fn to_wallet(row: &SqliteRow) -> Wallet {
    Wallet {
        chat_id: row.get("chat_id"),
        native_address: row.get("wallet_address_trx"),
        token_address: row.get("wallet_address_usdt"),
    }
}

pub async fn get_all_wallets(pool: &Pool<Sqlite>) -> Result<Vec<Wallet>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT chat_id, wallet_address_trx, wallet_address_usdt
         FROM wallets
         ORDER BY chat_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(to_wallet).collect())
}

pub async fn get_wallet_by_chat(
    pool: &Pool<Sqlite>,
    chat_id: i64,
) -> Result<Option<Wallet>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT chat_id, wallet_address_trx, wallet_address_usdt
         FROM wallets
         WHERE chat_id = ?",
    )
    .bind(chat_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(to_wallet))
}

pub async fn is_address_registered(pool: &Pool<Sqlite>, address: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        "SELECT chat_id FROM wallets
         WHERE wallet_address_trx = ? OR wallet_address_usdt = ?",
    )
    .bind(address)
    .bind(address)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

/// Returns `false` when either the chat or the native address is already taken.
pub async fn add_wallet(pool: &Pool<Sqlite>, wallet: &Wallet) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO wallets (chat_id, wallet_address_trx, wallet_address_usdt)
         VALUES (?, ?, ?)
         ON CONFLICT DO NOTHING",
    )
    .bind(wallet.chat_id)
    .bind(&wallet.native_address)
    .bind(&wallet.token_address)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
