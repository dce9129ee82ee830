//! End-to-end tests for the analysis pipeline against an in-memory market.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use trendwatch::config::Config;
use trendwatch::types::*;
use trendwatch::{AnalysisService, AppError, MarketDataSource, Result};

// =========================================================================
// In-memory market data source
// =========================================================================

#[derive(Default)]
struct MockSource {
    catalog: MarketCatalog,
    candles: HashMap<Timeframe, Vec<Candle>>,
    failing: HashSet<Timeframe>,
    snapshot: Option<OpenInterestSnapshot>,
    oi_history: Vec<OpenInterestPoint>,
}

#[async_trait]
impl MarketDataSource for MockSource {
    async fn resolve_symbol(&self, input: &str) -> Result<String> {
        self.catalog
            .resolve(input)
            .ok_or_else(|| AppError::NotFound(format!("Symbol '{}' not found", input)))
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<String>> {
        Ok(self.catalog.search(query))
    }

    async fn fetch_candles(
        &self,
        _symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        if self.failing.contains(&timeframe) {
            return Err(AppError::RateLimited("slow down".to_string()));
        }
        let series = self
            .candles
            .get(&timeframe)
            .ok_or_else(|| AppError::Unsupported(timeframe.to_string()))?;
        Ok(series[series.len().saturating_sub(limit)..].to_vec())
    }

    async fn fetch_open_interest_snapshot(&self, symbol: &str) -> Result<OpenInterestSnapshot> {
        self.snapshot
            .clone()
            .ok_or_else(|| AppError::NotFound(format!("No open interest for {}", symbol)))
    }

    async fn fetch_open_interest_history(
        &self,
        _symbol: &str,
        _timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<OpenInterestPoint>> {
        let h = &self.oi_history;
        Ok(h[h.len().saturating_sub(limit)..].to_vec())
    }
}

fn create_uptrend_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let base = 100.0 + i as f64 * 1.5;
            Candle {
                timestamp: 1_700_000_000_000 + i as i64 * 60_000,
                open: base,
                high: base + 2.0,
                low: base - 1.0,
                close: base + 1.0,
                volume: 1000.0,
            }
        })
        .collect()
}

fn flat_oi_history(count: usize) -> Vec<OpenInterestPoint> {
    (0..count)
        .map(|i| OpenInterestPoint {
            timestamp: 1_700_000_000_000 + i as i64 * 3_600_000,
            open_interest: 50_000.0,
        })
        .collect()
}

fn catalog() -> MarketCatalog {
    MarketCatalog::new(vec![
        Market::new("BTC", "USDT"),
        Market::new("ETH", "USDT"),
        Market::new("PEPE", "USDT"),
        Market::new("1000PEPE", "USDT"),
    ])
}

fn rising_market() -> MockSource {
    MockSource {
        catalog: catalog(),
        candles: Timeframe::ALL
            .iter()
            .map(|&tf| (tf, create_uptrend_candles(200)))
            .collect(),
        snapshot: Some(OpenInterestSnapshot {
            symbol: "BTCUSDT".to_string(),
            open_interest: 50_000.0,
            timestamp: 1_700_000_000_000,
        }),
        oi_history: flat_oi_history(48),
        ..Default::default()
    }
}

fn test_config() -> Config {
    Config {
        binance_futures_url: "http://localhost".to_string(),
        http_timeout_ms: 1_000,
        market_cache_ttl_secs: 60,
        candle_limit: 200,
        oi_candle_limit: 100,
        oi_history_limit: 48,
        levels_candle_limit: 100,
    }
}

fn service(source: MockSource) -> AnalysisService {
    AnalysisService::new(Arc::new(source), test_config())
}

// =========================================================================
// Full analysis
// =========================================================================

#[tokio::test]
async fn test_full_analysis_rising_market() {
    let analysis = service(rising_market()).analyze_symbol("btc").await.unwrap();

    assert_eq!(analysis.symbol, "BTCUSDT");
    assert!(analysis.has_data());
    assert_eq!(analysis.timeframes.len(), 4);
    for (_, trend) in analysis.timeframes.iter() {
        assert_eq!(trend.label, TrendLabel::StrongBullish);
    }

    let consensus = analysis.consensus.unwrap();
    assert_eq!(consensus.level, ConsensusLevel::StrongBullish);
    assert_eq!(consensus.bullish, 4);
    assert_eq!(consensus.suggestion, "Look for long entries on pullbacks");

    let oi = analysis.open_interest.unwrap();
    assert_eq!(oi.trend, OiTrend::Flat);
    assert_eq!(oi.divergence, PriceOiDivergence::None);
    assert_eq!(oi.price_move, PriceMove::Up);

    // RSI pinned at 100 everywhere, ADX at 100, all timeframes aligned.
    let risk = analysis.risk.unwrap();
    assert_eq!(risk.consensus, TrendDirection::Bullish);
    assert_eq!(risk.timeframes_analyzed, 4);
    assert_eq!(risk.avg_rsi, 100.0);
    assert!(risk.contains(RiskAlertKind::ExtremeRsiCluster));
    assert!(risk.contains(RiskAlertKind::OverextendedTrend));
    assert!(risk.contains(RiskAlertKind::TimeframeAlignment));
    assert_eq!(risk.critical.len(), 1);

    let recommendation = analysis.recommendation.unwrap();
    assert_eq!(recommendation.risk_score, 8);
    assert_eq!(recommendation.action, RecommendationAction::ExtremeCaution);
    assert_eq!(recommendation.bias, TradeBias::ContrarianShortOrFlat);
    assert_eq!(recommendation.specific_recommendations.len(), 1);

    let levels = analysis.price_levels.unwrap();
    assert_eq!(levels.kind, PlanKind::Long);
    assert!(levels.stop_loss.unwrap() < levels.current_price);
}

#[tokio::test]
async fn test_failed_and_short_timeframes_are_dropped() {
    let mut source = rising_market();
    source.failing.insert(Timeframe::FourHours);
    source
        .candles
        .insert(Timeframe::OneHour, create_uptrend_candles(30));

    let analysis = service(source).analyze_symbol("BTCUSDT").await.unwrap();

    let present: Vec<Timeframe> = analysis.timeframes.iter().map(|(tf, _)| tf).collect();
    assert_eq!(
        present,
        vec![Timeframe::FiveMinutes, Timeframe::FifteenMinutes]
    );
    assert_eq!(analysis.risk.unwrap().timeframes_analyzed, 2);
    assert!(analysis.recommendation.is_some());
}

#[tokio::test]
async fn test_no_data_terminal_state() {
    let mut source = rising_market();
    for tf in Timeframe::ALL {
        source.candles.insert(tf, create_uptrend_candles(49));
    }

    let analysis = service(source).analyze_symbol("ETH").await.unwrap();

    assert_eq!(analysis.symbol, "ETHUSDT");
    assert!(!analysis.has_data());
    assert!(analysis.consensus.is_none());
    assert!(analysis.open_interest.is_none());
    assert!(analysis.risk.is_none());
    assert!(analysis.recommendation.is_none());
    assert!(analysis.price_levels.is_none());
}

#[tokio::test]
async fn test_missing_open_interest_is_not_fatal() {
    let mut source = rising_market();
    source.snapshot = None;

    let analysis = service(source).analyze_symbol("BTC").await.unwrap();

    assert!(analysis.open_interest.is_none());
    assert!(analysis.risk.is_some());
    assert!(analysis.recommendation.is_some());
}

#[tokio::test]
async fn test_short_open_interest_history() {
    let mut source = rising_market();
    source.oi_history = flat_oi_history(10);

    let analysis = service(source).analyze_symbol("BTC").await.unwrap();
    assert!(analysis.open_interest.is_none());
}

#[tokio::test]
async fn test_unknown_symbol_not_found() {
    let result = service(rising_market()).analyze_symbol("DOGE").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_analysis_serializes_to_json() {
    let analysis = service(rising_market()).analyze_symbol("btc").await.unwrap();
    let json = serde_json::to_value(&analysis).unwrap();

    assert_eq!(json["symbol"], "BTCUSDT");
    assert_eq!(json["timeframes"]["5m"]["label"], "strong_bullish");
    assert_eq!(json["recommendation"]["action"], "extreme_caution");
    assert_eq!(
        json["consensus"]["suggestion"],
        "Look for long entries on pullbacks"
    );
    assert_eq!(json["timeframes"]["5m"]["indicators"]["rsi"], 100.0);
    assert!(json["timeframes"]["5m"]["indicators"]["ema200"].is_number());
    assert!(json["priceLevels"]["stopLoss"].is_number());
}

// =========================================================================
// Quick analysis and price snapshot
// =========================================================================

#[tokio::test]
async fn test_quick_analysis() {
    let quick = service(rising_market()).quick_analysis("BTC/USDT").await.unwrap();

    assert_eq!(quick.symbol, "BTCUSDT");
    let trend = quick.trend.unwrap();
    assert_eq!(trend.label, TrendLabel::StrongBullish);
    assert_eq!(trend.indicators.rsi, Some(100.0));
    assert_eq!(trend.indicators.adx, trend.adx_value);
    assert!(quick.open_interest.is_some());
}

#[tokio::test]
async fn test_quick_analysis_without_15m_data() {
    let mut source = rising_market();
    source.failing.insert(Timeframe::FifteenMinutes);

    let quick = service(source).quick_analysis("BTC").await.unwrap();
    assert!(quick.trend.is_none());
}

#[tokio::test]
async fn test_price_snapshot() {
    let snapshot = service(rising_market()).price_snapshot("btc").await.unwrap();

    assert_eq!(snapshot.price, 399.5);
    assert_eq!(snapshot.previous_close, 398.0);
    assert_eq!(snapshot.direction, PriceDirection::Up);
    assert!((snapshot.change_pct - 1.5 / 398.0 * 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_price_snapshot_needs_two_candles() {
    let mut source = rising_market();
    source
        .candles
        .insert(Timeframe::FiveMinutes, create_uptrend_candles(1));

    let result = service(source).price_snapshot("BTC").await;
    assert!(matches!(result, Err(AppError::InsufficientData(_))));
}

// =========================================================================
// Symbol search
// =========================================================================

#[tokio::test]
async fn test_suggestions_strip_usd_quote() {
    let suggestions = service(rising_market()).suggestions("pepeusd").await;
    assert_eq!(suggestions, vec!["1000PEPEUSDT", "PEPEUSDT"]);
}

#[tokio::test]
async fn test_search_symbols() {
    let found = service(rising_market()).search_symbols("eth").await.unwrap();
    assert_eq!(found, vec!["ETHUSDT"]);
}
