use std::env;
use std::time::Duration;

/// Application configuration.
///
/// Heuristic thresholds are compile-time constants in the signal modules;
/// only data access and fetch sizes are configurable.
#[derive(Debug, Clone)]
pub struct Config {
    /// Binance USD-M futures REST base URL.
    pub binance_futures_url: String,
    /// HTTP request timeout in milliseconds.
    pub http_timeout_ms: u64,
    /// Market catalog cache TTL in seconds.
    pub market_cache_ttl_secs: u64,
    /// Candles fetched per timeframe for trend analysis.
    pub candle_limit: usize,
    /// Hourly candles paired with open interest history.
    pub oi_candle_limit: usize,
    /// Hourly open interest samples requested.
    pub oi_history_limit: usize,
    /// 15m candles used for price level planning.
    pub levels_candle_limit: usize,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            binance_futures_url: env::var("BINANCE_FUTURES_URL")
                .unwrap_or_else(|_| "https://fapi.binance.com".to_string()),
            http_timeout_ms: env_or("HTTP_TIMEOUT_MS", 10_000),
            market_cache_ttl_secs: env_or("MARKET_CACHE_TTL_SECS", 3600),
            candle_limit: env_or("CANDLE_LIMIT", 200),
            oi_candle_limit: env_or("OI_CANDLE_LIMIT", 100),
            oi_history_limit: env_or("OI_HISTORY_LIMIT", 48),
            levels_candle_limit: env_or("LEVELS_CANDLE_LIMIT", 100),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    pub fn market_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.market_cache_ttl_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
