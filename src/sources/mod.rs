//! Market data sources.
//!
//! The analysis pipeline only sees the [`MarketDataSource`] trait. The
//! Binance USD-M futures client is the production implementation.

pub mod binance;

pub use binance::BinanceFuturesClient;

use crate::error::Result;
use crate::types::{Candle, OpenInterestPoint, OpenInterestSnapshot, Timeframe};
use async_trait::async_trait;

/// Candle and open interest provider for perpetual futures markets.
///
/// Implementations own their transport, retries and rate limiting. Candle
/// series are returned ascending by timestamp with unique timestamps.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Map a user-typed ticker (`btc`, `BTC/USDT`, `BTCUSD`, ...) to the
    /// exchange-canonical symbol. Fails with `NotFound` for unknown markets.
    async fn resolve_symbol(&self, input: &str) -> Result<String>;

    /// Active USD-quoted markets whose id contains `query`, sorted, at most 10.
    async fn search_symbols(&self, query: &str) -> Result<Vec<String>>;

    /// Latest `limit` candles for a timeframe.
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>>;

    /// Current open interest.
    async fn fetch_open_interest_snapshot(&self, symbol: &str) -> Result<OpenInterestSnapshot>;

    /// Open interest history sampled at `timeframe`.
    async fn fetch_open_interest_history(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<OpenInterestPoint>>;
}
