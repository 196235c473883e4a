// Configuration for:
// - TronGrid endpoint, API key and request budget
// - Database connection string
// - Admin server listening address/port
// - Polling interval and dedup cache settings
// - Notification rendering (UTC offset, native/token symbols)

use dotenv::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub trongrid_api_url: String,
    pub trongrid_api_key: Option<String>,
    pub telegram_token: Option<String>,
    pub polling_interval: Duration,
    pub rpc_timeout_secs: u64,
    pub rpc_rate_limit: Option<u32>,
    pub fetch_limit: u32,
    pub cache_ttl: Duration,
    pub cache_max_capacity: u64,
    pub notify_utc_offset_hours: i32,
    pub native_symbol: String,
    pub native_decimals: u32,
    pub default_token_symbol: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:deposits.db".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            trongrid_api_url: "https://api.trongrid.io".to_string(),
            trongrid_api_key: None,
            telegram_token: None,
            polling_interval: Duration::from_secs(30),
            rpc_timeout_secs: 10,
            rpc_rate_limit: None,
            fetch_limit: 10,
            cache_ttl: Duration::from_secs(3600),
            cache_max_capacity: 10_000,
            notify_utc_offset_hours: 9,
            native_symbol: "TRX".to_string(),
            native_decimals: 6,
            default_token_symbol: "USDT".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);
        let server_host = env::var("SERVER_HOST").unwrap_or(defaults.server_host);
        let server_port = parse_var("SERVER_PORT", defaults.server_port);
        let trongrid_api_url = env::var("TRONGRID_API_URL").unwrap_or(defaults.trongrid_api_url);
        let trongrid_api_key = non_empty_var("TRONGRID_API_KEY");
        let telegram_token = non_empty_var("TELEGRAM_TOKEN");
        let polling_interval = Duration::from_secs(parse_var(
            "POLLING_INTERVAL_SECS",
            defaults.polling_interval.as_secs(),
        ));
        let rpc_timeout_secs = parse_var("RPC_TIMEOUT_SECS", defaults.rpc_timeout_secs);
        let rpc_rate_limit = env::var("RPC_RATE_LIMIT")
            .map(|v| v.parse().ok())
            .unwrap_or(None);
        let fetch_limit = parse_var("FETCH_LIMIT", defaults.fetch_limit);
        let cache_ttl = Duration::from_secs(parse_var("CACHE_TTL", defaults.cache_ttl.as_secs()));
        let cache_max_capacity = parse_var("CACHE_MAX_CAPACITY", defaults.cache_max_capacity);
        let notify_utc_offset_hours =
            parse_var("NOTIFY_UTC_OFFSET_HOURS", defaults.notify_utc_offset_hours);
        let native_symbol = env::var("NATIVE_SYMBOL").unwrap_or(defaults.native_symbol);
        let native_decimals = parse_var("NATIVE_DECIMALS", defaults.native_decimals);
        let default_token_symbol =
            env::var("DEFAULT_TOKEN_SYMBOL").unwrap_or(defaults.default_token_symbol);

        Self {
            database_url,
            server_host,
            server_port,
            trongrid_api_url,
            trongrid_api_key,
            telegram_token,
            polling_interval,
            rpc_timeout_secs,
            rpc_rate_limit,
            fetch_limit,
            cache_ttl,
            cache_max_capacity,
            notify_utc_offset_hours,
            native_symbol,
            native_decimals,
            default_token_symbol,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
