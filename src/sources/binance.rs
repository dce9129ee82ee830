use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::Cache;
use crate::sources::MarketDataSource;
use crate::types::{
    normalize_series, Candle, Market, MarketCatalog, OpenInterestPoint, OpenInterestSnapshot,
    Timeframe,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Binance caps klines requests at 1500 rows.
const MAX_KLINES: usize = 1500;
/// Binance caps open interest history requests at 500 rows.
const MAX_OI_HISTORY: usize = 500;

const CATALOG_KEY: &str = "exchange_info";

/// Binance error code for an unknown symbol.
const INVALID_SYMBOL_CODE: i64 = -1121;

/// Subset of `/fapi/v1/exchangeInfo`.
#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SymbolInfo {
    symbol: String,
    status: String,
    contract_type: String,
    base_asset: String,
    quote_asset: String,
}

impl SymbolInfo {
    fn into_market(self) -> Market {
        let active = self.status == "TRADING" && self.contract_type == "PERPETUAL";
        Market {
            symbol: self.symbol,
            base: self.base_asset,
            quote: self.quote_asset,
            active,
        }
    }
}

/// `/fapi/v1/openInterest` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenInterestResponse {
    symbol: String,
    open_interest: String,
    time: i64,
}

/// One row of `/futures/data/openInterestHist`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenInterestHistRow {
    sum_open_interest: String,
    timestamp: i64,
}

/// Binance error body.
#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    msg: String,
}

fn parse_f64(value: &str, field: &str) -> Result<f64> {
    value
        .parse()
        .map_err(|_| AppError::ExternalApi(format!("Invalid {} value: {}", field, value)))
}

/// Parse a kline row: `[openTime, open, high, low, close, volume, closeTime, ...]`.
fn parse_kline(row: &[serde_json::Value]) -> Result<Candle> {
    let number = |index: usize, field: &str| -> Result<f64> {
        match row.get(index) {
            Some(serde_json::Value::String(s)) => parse_f64(s, field),
            Some(serde_json::Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| AppError::ExternalApi(format!("Invalid {} value", field))),
            _ => Err(AppError::ExternalApi(format!("Missing kline field {}", field))),
        }
    };

    let timestamp = row
        .first()
        .and_then(|v| v.as_i64())
        .ok_or_else(|| AppError::ExternalApi("Missing kline open time".to_string()))?;

    Ok(Candle {
        timestamp,
        open: number(1, "open")?,
        high: number(2, "high")?,
        low: number(3, "low")?,
        close: number(4, "close")?,
        volume: number(5, "volume")?,
    })
}

/// First 200 characters of a response body for logs and errors.
fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}

/// Map a failed response to an error.
fn error_for_status(status: StatusCode, body: &str) -> AppError {
    if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() == 418 {
        return AppError::RateLimited(format!("Binance returned {}", status));
    }

    if let Ok(api_error) = serde_json::from_str::<ApiError>(body) {
        if api_error.code == INVALID_SYMBOL_CODE {
            return AppError::NotFound(api_error.msg);
        }
        return AppError::ExternalApi(format!(
            "Binance API error {} ({}): {}",
            status, api_error.code, api_error.msg
        ));
    }

    AppError::ExternalApi(format!("Binance API error {}: {}", status, snippet(body)))
}

/// Binance USD-M futures REST client.
pub struct BinanceFuturesClient {
    client: Client,
    base_url: String,
    catalog: Cache<MarketCatalog>,
}

impl BinanceFuturesClient {
    /// Create a new client from configuration.
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .user_agent("trendwatch/0.1")
            .timeout(config.http_timeout())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.binance_futures_url.trim_end_matches('/').to_string(),
            catalog: Cache::new(config.market_cache_ttl()),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Binance GET {} {:?}", path, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Binance request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Binance API returned {}: {}", status, snippet(&text));
            return Err(error_for_status(status, &text));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse Binance response: {}", e)))
    }

    /// Market catalog, refreshed once the cache TTL expires.
    pub async fn markets(&self) -> Result<MarketCatalog> {
        if let Some(catalog) = self.catalog.get(CATALOG_KEY) {
            return Ok(catalog);
        }

        let info: ExchangeInfo = self.get_json("/fapi/v1/exchangeInfo", &[]).await?;
        let catalog = MarketCatalog::new(
            info.symbols
                .into_iter()
                .map(SymbolInfo::into_market)
                .collect(),
        );
        if catalog.is_empty() {
            warn!("Binance exchangeInfo returned no markets");
        } else {
            info!("Loaded {} Binance futures markets", catalog.len());
        }

        self.catalog.insert(CATALOG_KEY, catalog.clone());
        Ok(catalog)
    }
}

#[async_trait]
impl MarketDataSource for BinanceFuturesClient {
    async fn resolve_symbol(&self, input: &str) -> Result<String> {
        self.markets()
            .await?
            .resolve(input)
            .ok_or_else(|| AppError::NotFound(format!("Symbol '{}' not found", input.trim())))
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<String>> {
        Ok(self.markets().await?.search(query))
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let rows: Vec<Vec<serde_json::Value>> = self
            .get_json(
                "/fapi/v1/klines",
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", timeframe.as_str().to_string()),
                    ("limit", limit.clamp(1, MAX_KLINES).to_string()),
                ],
            )
            .await?;

        let candles = rows
            .iter()
            .map(|row| parse_kline(row))
            .collect::<Result<Vec<_>>>()?;

        debug!("Fetched {} {} candles for {}", candles.len(), timeframe, symbol);
        Ok(normalize_series(candles))
    }

    async fn fetch_open_interest_snapshot(&self, symbol: &str) -> Result<OpenInterestSnapshot> {
        let response: OpenInterestResponse = self
            .get_json("/fapi/v1/openInterest", &[("symbol", symbol.to_string())])
            .await?;

        Ok(OpenInterestSnapshot {
            open_interest: parse_f64(&response.open_interest, "openInterest")?,
            symbol: response.symbol,
            timestamp: response.time,
        })
    }

    async fn fetch_open_interest_history(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<OpenInterestPoint>> {
        let rows: Vec<OpenInterestHistRow> = self
            .get_json(
                "/futures/data/openInterestHist",
                &[
                    ("symbol", symbol.to_string()),
                    ("period", timeframe.as_str().to_string()),
                    ("limit", limit.clamp(1, MAX_OI_HISTORY).to_string()),
                ],
            )
            .await?;

        let mut points = rows
            .iter()
            .map(|row| {
                Ok(OpenInterestPoint {
                    timestamp: row.timestamp,
                    open_interest: parse_f64(&row.sum_open_interest, "sumOpenInterest")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        points.sort_by_key(|p| p.timestamp);

        Ok(points)
    }
}
