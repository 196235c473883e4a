use tron_deposit_notifier::{
    blockchain::{TransactionClassifier, TransactionFetcher, TronGridClient},
    config::Config,
    models::Wallet,
    validation::validate_tron_address,
};
use tracing::{error, info, warn, Level};

// USDT contract: busy enough to always have recent history
const DEFAULT_ADDRESS: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting TronGrid fetch test...");

    let config = Config::from_env();
    let address = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TEST_WALLET_ADDRESS").ok())
        .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

    // 1. Validate the address the same way the admin API does
    validate_tron_address(&address)?;
    info!("✅ Address {} is valid", address);

    // 2. Raw endpoints
    let client = TronGridClient::new(&config)?;

    match client.get_account_transactions(&address).await {
        Ok(native) => info!("✅ Native history: {} records", native.len()),
        Err(e) => error!("❌ Failed to fetch native history: {}", e),
    }

    match client.get_trc20_transfers(&address).await {
        Ok(token) => info!("✅ TRC20 transfers: {} records", token.len()),
        Err(e) => error!("❌ Failed to fetch TRC20 transfers: {}", e),
    }

    // 3. Fetch + classify as the polling loop would
    let wallet = Wallet {
        chat_id: 0,
        native_address: address.clone(),
        token_address: address.clone(),
    };
    let batch = client
        .fetch_recent(&wallet.native_address, &wallet.token_address)
        .await;
    if batch.is_empty() {
        warn!("Fetched nothing for {}", address);
    }

    let classifier = TransactionClassifier::from_config(&config);
    let deposits = classifier.classify(&wallet, &batch);
    info!(
        "✅ {} of {} records are deposits to {}",
        deposits.len(),
        batch.len(),
        address
    );

    for deposit in &deposits {
        info!(
            "   {} {} {} at {:?} ({})",
            deposit.kind, deposit.amount, deposit.symbol, deposit.timestamp, deposit.transaction_id
        );
    }

    info!("TronGrid fetch test completed");
    Ok(())
}
