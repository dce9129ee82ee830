use serde::{Deserialize, Serialize};

/// Quote assets treated as US dollars.
pub const USD_QUOTES: &[&str] = &["USDT", "USD", "USDC", "BUSD"];

/// Default quote asset for bare tickers.
pub const DEFAULT_QUOTE: &str = "USDT";

/// Maximum number of search results.
pub const MAX_SEARCH_RESULTS: usize = 10;

/// A tradable perpetual futures market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// Exchange-canonical id, e.g. `BTCUSDT`.
    pub symbol: String,
    pub base: String,
    pub quote: String,
    pub active: bool,
}

impl Market {
    pub fn new(base: &str, quote: &str) -> Self {
        Self {
            symbol: format!("{}{}", base, quote),
            base: base.to_string(),
            quote: quote.to_string(),
            active: true,
        }
    }

    pub fn is_usd_quoted(&self) -> bool {
        USD_QUOTES.contains(&self.quote.as_str())
    }
}

/// Snapshot of the markets listed on an exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketCatalog {
    markets: Vec<Market>,
}

impl MarketCatalog {
    pub fn new(markets: Vec<Market>) -> Self {
        Self { markets }
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    fn is_listed(&self, symbol: &str) -> bool {
        self.markets.iter().any(|m| m.active && m.symbol == symbol)
    }

    /// Candidate exchange ids for a user-typed ticker, most literal first.
    ///
    /// Accepts `BTC/USDT`, `BTC/USDT:USDT`, `BTCUSDT`, `BTCUSD` and bare `BTC`.
    pub fn candidates(input: &str) -> Vec<String> {
        let cleaned = input.trim().to_uppercase();
        if cleaned.is_empty() {
            return Vec::new();
        }

        // Settlement suffix: BTC/USDT:USDT
        let pair = cleaned.split(':').next().unwrap_or(&cleaned);

        if let Some((base, quote)) = pair.split_once('/') {
            return vec![format!("{}{}", base, quote)];
        }

        let mut out = vec![pair.to_string()];
        if pair.ends_with(DEFAULT_QUOTE) {
            return out;
        }
        if let Some(base) = pair.strip_suffix("USD") {
            out.push(format!("{}{}", base, DEFAULT_QUOTE));
        } else {
            out.push(format!("{}{}", pair, DEFAULT_QUOTE));
        }
        out
    }

    /// Resolve a user-typed ticker to a listed, active market id.
    pub fn resolve(&self, input: &str) -> Option<String> {
        Self::candidates(input)
            .into_iter()
            .find(|candidate| self.is_listed(candidate))
    }

    /// Active USD-quoted markets whose id contains `query`, sorted.
    pub fn search(&self, query: &str) -> Vec<String> {
        let needle: String = query
            .trim()
            .to_uppercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut found: Vec<String> = self
            .markets
            .iter()
            .filter(|m| m.active && m.is_usd_quoted() && m.symbol.contains(&needle))
            .map(|m| m.symbol.clone())
            .collect();
        found.sort();
        found.dedup();
        found.truncate(MAX_SEARCH_RESULTS);
        found
    }
}

/// Strip a trailing USD-like quote for suggestion searches (`PEPEUSDT` -> `PEPE`).
pub fn base_of(symbol: &str) -> &str {
    let symbol = symbol.trim();
    symbol
        .strip_suffix("USDT")
        .or_else(|| symbol.strip_suffix("USD"))
        .filter(|base| !base.is_empty())
        .unwrap_or(symbol)
}
