//! Symbol analysis orchestration.
//!
//! [`AnalysisService`] owns the market data source and runs the signal
//! pipeline end to end. Data source failures for a single slice (one
//! timeframe, open interest, price levels) only remove that slice from the
//! result.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::signals::{self, open_interest, risk};
use crate::sources::MarketDataSource;
use crate::types::{
    base_of, Candle, OiAssessment, PriceDirection, PriceSnapshot, QuickAnalysis, SymbolAnalysis,
    Timeframe, TrendDirection,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Candles fetched for a price snapshot.
const SNAPSHOT_CANDLES: usize = 5;

/// Suggestions shown when a symbol cannot be resolved.
const MAX_SUGGESTIONS: usize = 5;

/// Runs analyses against a market data source.
pub struct AnalysisService {
    source: Arc<dyn MarketDataSource>,
    config: Config,
}

impl AnalysisService {
    pub fn new(source: Arc<dyn MarketDataSource>, config: Config) -> Self {
        Self { source, config }
    }

    /// Resolve user input to an exchange symbol.
    pub async fn resolve_symbol(&self, input: &str) -> Result<String> {
        self.source.resolve_symbol(input).await
    }

    /// Search listed markets.
    pub async fn search_symbols(&self, query: &str) -> Result<Vec<String>> {
        self.source.search_symbols(query).await
    }

    /// Close matches for an unresolvable input, at most five.
    pub async fn suggestions(&self, input: &str) -> Vec<String> {
        let upper = input.trim().to_uppercase();
        match self.source.search_symbols(base_of(&upper)).await {
            Ok(mut found) => {
                found.truncate(MAX_SUGGESTIONS);
                found
            }
            Err(e) => {
                warn!("Symbol search for {} failed: {}", input, e);
                Vec::new()
            }
        }
    }

    async fn candles_or_warn(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Option<Vec<Candle>> {
        match self.source.fetch_candles(symbol, timeframe, limit).await {
            Ok(candles) => Some(candles),
            Err(e) => {
                warn!("Failed to fetch {} candles for {}: {}", timeframe, symbol, e);
                None
            }
        }
    }

    /// Open interest assessment from hourly candles and OI history.
    async fn open_interest(&self, symbol: &str) -> Option<OiAssessment> {
        let (candles, snapshot, history) = tokio::join!(
            self.source
                .fetch_candles(symbol, Timeframe::OneHour, self.config.oi_candle_limit),
            self.source.fetch_open_interest_snapshot(symbol),
            self.source.fetch_open_interest_history(
                symbol,
                Timeframe::OneHour,
                self.config.oi_history_limit
            ),
        );

        let (candles, snapshot, history) = match (candles, snapshot, history) {
            (Ok(c), Ok(s), Ok(h)) => (c, s, h),
            (c, s, h) => {
                let reason = [c.err(), s.err(), h.err()]
                    .into_iter()
                    .flatten()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                warn!("Open interest unavailable for {}: {}", symbol, reason);
                return None;
            }
        };

        let assessment = open_interest::analyze(&snapshot, &history, &candles);
        match &assessment {
            Some(oi) => debug!(
                "{}: open interest {}, {}",
                symbol,
                oi.trend.label(),
                oi.divergence.label()
            ),
            None => debug!(
                "Open interest history too short for {} ({} samples)",
                symbol,
                history.len()
            ),
        }
        assessment
    }

    /// Full multi-timeframe analysis.
    ///
    /// Fails only when the symbol cannot be resolved. A symbol without enough
    /// history on any timeframe yields [`SymbolAnalysis::no_data`].
    pub async fn analyze_symbol(&self, input: &str) -> Result<SymbolAnalysis> {
        let symbol = self.source.resolve_symbol(input).await?;
        info!("Analyzing {}", symbol);

        let timeframes =
            signals::aggregate(self.source.as_ref(), &symbol, self.config.candle_limit).await;
        if timeframes.is_empty() {
            info!("No timeframe has enough data for {}", symbol);
            return Ok(SymbolAnalysis::no_data(symbol));
        }

        let (oi, level_candles) = tokio::join!(
            self.open_interest(&symbol),
            self.candles_or_warn(
                &symbol,
                Timeframe::FifteenMinutes,
                self.config.levels_candle_limit
            ),
        );

        let risk = risk::evaluate(&timeframes, oi.as_ref());
        let recommendation = risk.as_ref().map(signals::recommend);
        if let (Some(alerts), Some(rec)) = (&risk, &recommendation) {
            info!(
                "{}: {} risk alerts, score {}: {} ({})",
                symbol,
                alerts.total(),
                rec.risk_score,
                rec.action.label(),
                rec.bias.label()
            );
        }

        let direction = risk
            .as_ref()
            .map(|r| r.consensus)
            .unwrap_or(TrendDirection::Neutral);
        let price_levels =
            level_candles.and_then(|candles| signals::plan_for_series(&candles, direction));

        let consensus = signals::consensus(&timeframes);
        debug!(
            "{}: {} timeframes, consensus {}",
            symbol,
            timeframes.len(),
            consensus.level.label()
        );

        Ok(SymbolAnalysis {
            symbol,
            timeframes,
            consensus: Some(consensus),
            open_interest: oi,
            risk,
            recommendation,
            price_levels,
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// 15m trend plus open interest.
    pub async fn quick_analysis(&self, input: &str) -> Result<QuickAnalysis> {
        let symbol = self.source.resolve_symbol(input).await?;

        let (candles, open_interest) = tokio::join!(
            self.candles_or_warn(
                &symbol,
                Timeframe::FifteenMinutes,
                self.config.candle_limit
            ),
            self.open_interest(&symbol),
        );
        let trend = candles.and_then(|c| signals::assess_trend(&c));

        Ok(QuickAnalysis {
            symbol,
            trend,
            open_interest,
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// Latest 5m close and its change from the previous close.
    pub async fn price_snapshot(&self, input: &str) -> Result<PriceSnapshot> {
        let symbol = self.source.resolve_symbol(input).await?;
        let candles = self
            .source
            .fetch_candles(&symbol, Timeframe::FiveMinutes, SNAPSHOT_CANDLES)
            .await?;

        let [.., previous, latest] = candles.as_slice() else {
            return Err(AppError::InsufficientData(format!(
                "Need 2 candles for {}, got {}",
                symbol,
                candles.len()
            )));
        };

        let change_pct = if previous.close == 0.0 {
            0.0
        } else {
            (latest.close - previous.close) / previous.close * 100.0
        };
        let direction = if change_pct > 0.0 {
            PriceDirection::Up
        } else if change_pct < 0.0 {
            PriceDirection::Down
        } else {
            PriceDirection::Flat
        };

        Ok(PriceSnapshot {
            price: latest.close,
            previous_close: previous.close,
            change_pct,
            direction,
            timestamp: latest.timestamp,
            symbol,
        })
    }
}
