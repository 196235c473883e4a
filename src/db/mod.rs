pub mod connection;
pub mod migration;
pub mod processed;
pub mod wallet;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}
