// Initialize configuration
// Set up logging
// Create database connection pool
// Wire fetcher, dedup store and Telegram notifier into the deposit pipeline
// Start deposit polling task
// Start admin HTTP server

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tron_deposit_notifier::{
    api, cache,
    blockchain::{DepositMonitor, DepositProcessor, TransactionClassifier, TransactionFetcher, TronGridClient},
    config::Config,
    db::connection,
    notification::{NotificationDispatcher, NotificationPort, TelegramNotifier},
    service::{DedupStore, SqliteDedupStore, SqliteWalletRegistry, WalletRegistry},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tron-deposit-notifier");

    // Load configuration
    let config = Config::from_env();
    let telegram_token = config
        .telegram_token
        .clone()
        .ok_or("TELEGRAM_TOKEN must be set")?;
    info!(
        "Configuration loaded: api {}, polling every {:?}, fetch limit {}",
        config.trongrid_api_url, config.polling_interval, config.fetch_limit
    );

    // Setup database connection
    let db_pool = connection::establish_connection(&config.database_url).await?;
    info!("Database connection established");

    // Initialize cache
    let cache = cache::init_cache(&config);
    info!(
        "Cache initialized with TTL: {:?} and capacity: {}",
        config.cache_ttl, config.cache_max_capacity
    );

    let registry: Arc<dyn WalletRegistry> = Arc::new(SqliteWalletRegistry::new(db_pool.clone()));
    let dedup: Arc<dyn DedupStore> = Arc::new(SqliteDedupStore::new(db_pool.clone(), cache));
    let fetcher: Arc<dyn TransactionFetcher> = Arc::new(TronGridClient::new(&config)?);
    let notifier: Arc<dyn NotificationPort> = Arc::new(TelegramNotifier::new(&telegram_token));

    let processor = Arc::new(DepositProcessor::new(
        fetcher,
        TransactionClassifier::from_config(&config),
        dedup,
        NotificationDispatcher::new(notifier, config.notify_utc_offset_hours),
    ));
    let monitor = Arc::new(DepositMonitor::new(
        registry.clone(),
        processor,
        config.polling_interval,
    ));

    // Start deposit polling task
    let shutdown = CancellationToken::new();
    let polling = tokio::spawn(monitor.start_polling(shutdown.clone()));
    info!("Deposit polling task started");

    // Start HTTP server
    let app_state = Arc::new(AppState {
        db_pool,
        registry,
    });
    let app = api::create_router(app_state);
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Starting server on {}", addr);

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
            server_shutdown.cancel();
        })
        .await?;

    shutdown.cancel();
    let _ = polling.await;

    info!("tron-deposit-notifier stopped");
    Ok(())
}
