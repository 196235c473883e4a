use crate::config::Config;
use crate::models::TransferBatch;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

// Header names must be lowercase for `HeaderMap::insert` with a static str
pub const API_KEY_HEADER: &str = "tron-pro-api-key";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid API key header value")]
    InvalidApiKey,
}

/// Source of the most recent transfers for one wallet.
///
/// Implementations never fail: an unreachable upstream yields an empty batch
/// and the wallet is simply retried on the next cycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionFetcher: Send + Sync {
    async fn fetch_recent(&self, native_address: &str, token_address: &str) -> TransferBatch;
}

/// Envelope shared by TronGrid list endpoints.
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default = "default_success")]
    success: bool,
    error: Option<String>,
}

fn default_success() -> bool {
    true
}

pub struct TronGridClient {
    http: Client,
    base_url: String,
    limit: u32,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl TronGridClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let timeout = Duration::from_secs(config.rpc_timeout_secs);

        let mut headers = HeaderMap::new();
        if let Some(key) = &config.trongrid_api_key {
            let value = HeaderValue::from_str(key).map_err(|_| ClientError::InvalidApiKey)?;
            headers.insert(API_KEY_HEADER, value);
        } else {
            warn!("TRONGRID_API_KEY is not set, requests will use the anonymous quota");
        }

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let limiter = config
            .rpc_rate_limit
            .and_then(NonZeroU32::new)
            .map(|rate| RateLimiter::direct(Quota::per_second(rate)));

        info!(
            "Initializing TronGrid client with endpoint: {}, timeout: {:?}, rate limit: {:?}",
            config.trongrid_api_url, timeout, config.rpc_rate_limit
        );

        Ok(Self {
            http,
            base_url: config.trongrid_api_url.trim_end_matches('/').to_string(),
            limit: config.fetch_limit,
            limiter,
        })
    }

    /// Latest native account history (all contract types) for an address
    pub async fn get_account_transactions(&self, address: &str) -> Result<Vec<Value>, ClientError> {
        self.get_list(&format!("/v1/accounts/{}/transactions", address))
            .await
    }

    /// Latest TRC20 transfers touching an address
    pub async fn get_trc20_transfers(&self, address: &str) -> Result<Vec<Value>, ClientError> {
        self.get_list(&format!("/v1/accounts/{}/transactions/trc20", address))
            .await
    }

    async fn get_list(&self, path: &str) -> Result<Vec<Value>, ClientError> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(&[("limit", self.limit)])
            .send()
            .await?
            .error_for_status()?;

        let body: ListResponse = response.json().await?;
        if !body.success {
            return Err(ClientError::Api(
                body.error.unwrap_or_else(|| "request was not successful".to_string()),
            ));
        }

        Ok(body.data)
    }
}

#[async_trait]
impl TransactionFetcher for TronGridClient {
    async fn fetch_recent(&self, native_address: &str, token_address: &str) -> TransferBatch {
        if native_address.is_empty() || token_address.is_empty() {
            warn!("Wallet has an empty address, skipping fetch");
            return TransferBatch::default();
        }

        match tokio::try_join!(
            self.get_account_transactions(native_address),
            self.get_trc20_transfers(token_address)
        ) {
            Ok((native, token)) => TransferBatch { native, token },
            Err(e) => {
                warn!(
                    "Failed to fetch transactions for {}/{}: {}",
                    native_address, token_address, e
                );
                TransferBatch::default()
            }
        }
    }
}
