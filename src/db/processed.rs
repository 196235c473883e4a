use crate::models::ProcessedRecord;
use sqlx::{Pool, Row, Sqlite};

/// Insert the id unless it already exists. Returns `true` when this call created the row.
pub async fn insert_if_absent(
    pool: &Pool<Sqlite>,
    transaction_id: &str,
    kind: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO processed_transactions (transaction_id, kind)
         VALUES (?, ?)
         ON CONFLICT(transaction_id) DO NOTHING",
    )
    .bind(transaction_id)
    .bind(kind)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn is_processed(pool: &Pool<Sqlite>, transaction_id: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 FROM processed_transactions WHERE transaction_id = ?")
        .bind(transaction_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

pub async fn get_record(
    pool: &Pool<Sqlite>,
    transaction_id: &str,
) -> Result<Option<ProcessedRecord>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT transaction_id, kind, processed_at
         FROM processed_transactions
         WHERE transaction_id = ?",
    )
    .bind(transaction_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| ProcessedRecord {
        transaction_id: row.get("transaction_id"),
        kind: row.get("kind"),
        processed_at: row.get("processed_at"),
    }))
}

pub async fn count_processed(pool: &Pool<Sqlite>) -> Result<i64, sqlx::Error> {
    let count = sqlx::query("SELECT COUNT(*) FROM processed_transactions")
        .fetch_one(pool)
        .await?
        .get::<i64, _>(0);

    Ok(count)
}
