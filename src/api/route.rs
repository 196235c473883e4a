use crate::{
    api::{
        error::ApiError,
        response::{created, ApiResponse},
    },
    db::processed,
    models::Wallet,
    service::Registration,
    state::AppState,
    validation::{validate_chat_id, validate_tron_address},
};
use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

// POST /wallets request body
#[derive(Debug, Deserialize)]
pub struct RegisterWalletRequest {
    pub chat_id: i64,
    pub address: String,
}

// GET /transactions/{id} response body
#[derive(Debug, Serialize)]
pub struct TransactionStatus {
    pub transaction_id: String,
    pub processed: bool,
    pub kind: Option<String>,
    pub processed_at: Option<i64>,
}

// Create router with all routes
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/wallets", get(list_wallets).post(register_wallet))
        .route("/transactions/{id}", get(get_transaction_status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn health() -> ApiResponse<&'static str> {
    ApiResponse { data: "ok" }
}

// GET /wallets handler
async fn list_wallets(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<Vec<Wallet>>, ApiError> {
    let wallets = state.registry.list_wallets().await?;
    Ok(ApiResponse { data: wallets })
}

// POST /wallets handler
async fn register_wallet(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterWalletRequest>,
) -> Result<Response, ApiError> {
    let address = request.address.trim();
    info!(
        "Processing registration for chat {}, address {}",
        request.chat_id, address
    );

    validate_chat_id(request.chat_id)?;
    validate_tron_address(address)?;

    match state.registry.register(request.chat_id, address).await? {
        Registration::Registered(wallet) => Ok(created(wallet)),
        Registration::ChatAlreadyRegistered => Err(ApiError::Conflict(
            "This chat already has a registered wallet".to_string(),
        )),
        Registration::AddressInUse => Err(ApiError::Conflict(
            "This address is registered by another chat".to_string(),
        )),
    }
}

// GET /transactions/{id} handler
async fn get_transaction_status(
    State(state): State<Arc<AppState>>,
    Path(transaction_id): Path<String>,
) -> Result<ApiResponse<TransactionStatus>, ApiError> {
    if transaction_id.trim().is_empty() {
        return Err(ApiError::BadRequest("transaction id is empty".to_string()));
    }

    let record = processed::get_record(&state.db_pool, &transaction_id).await?;

    let status = match record {
        Some(record) => TransactionStatus {
            transaction_id: record.transaction_id,
            processed: true,
            kind: record.kind,
            processed_at: Some(record.processed_at),
        },
        None => TransactionStatus {
            transaction_id,
            processed: false,
            kind: None,
            processed_at: None,
        },
    };

    Ok(ApiResponse { data: status })
}
