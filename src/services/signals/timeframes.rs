//! Multi-timeframe aggregation and trend consensus.

use crate::services::signals::trend::assess_trend;
use crate::sources::MarketDataSource;
use crate::types::{Consensus, ConsensusLevel, Timeframe, TimeframeResults, TrendAssessment};
use futures_util::future::join_all;
use tracing::{debug, warn};

/// Share of timeframes that must agree for a strong consensus.
const STRONG_AGREEMENT: f64 = 0.75;

/// Plurality vote over the trend labels in `results`.
pub fn consensus(results: &TimeframeResults) -> Consensus {
    let (bullish, bearish, sideways) = results.direction_counts();
    let total = results.len();
    let supermajority = total as f64 * STRONG_AGREEMENT;

    let level = if total == 0 {
        ConsensusLevel::NoConsensus
    } else if bullish as f64 >= supermajority {
        ConsensusLevel::StrongBullish
    } else if bearish as f64 >= supermajority {
        ConsensusLevel::StrongBearish
    } else if bullish > bearish {
        ConsensusLevel::ModerateBullish
    } else if bearish > bullish {
        ConsensusLevel::ModerateBearish
    } else {
        ConsensusLevel::NoConsensus
    };

    Consensus {
        level,
        bullish,
        bearish,
        sideways,
        total,
        suggestion: level.suggestion().to_string(),
    }
}

async fn assess_timeframe(
    source: &dyn MarketDataSource,
    symbol: &str,
    timeframe: Timeframe,
    limit: usize,
) -> Option<(Timeframe, TrendAssessment)> {
    let candles = match source.fetch_candles(symbol, timeframe, limit).await {
        Ok(candles) => candles,
        Err(e) => {
            warn!("Failed to fetch {} candles for {}: {}", timeframe, symbol, e);
            return None;
        }
    };

    match assess_trend(&candles) {
        Some(assessment) => {
            debug!("{} {}: {}", symbol, timeframe, assessment.label.label());
            Some((timeframe, assessment))
        }
        None => {
            debug!(
                "{} {}: insufficient data ({} candles)",
                symbol,
                timeframe,
                candles.len()
            );
            None
        }
    }
}

/// Assess every timeframe in [`Timeframe::ALL`] concurrently.
///
/// Timeframes that fail to fetch or lack history are left out; the others
/// are still returned.
pub async fn aggregate(
    source: &dyn MarketDataSource,
    symbol: &str,
    limit: usize,
) -> TimeframeResults {
    let tasks = Timeframe::ALL
        .iter()
        .map(|&tf| assess_timeframe(source, symbol, tf, limit));

    join_all(tasks).await.into_iter().flatten().collect()
}
