use crate::types::{
    Consensus, OiAssessment, PriceLevelPlan, Recommendation, RiskAlertSet, TimeframeResults,
    TrendAssessment,
};
use serde::{Deserialize, Serialize};

/// Result of a full multi-timeframe analysis.
///
/// An empty `timeframes` map with every other field absent is the valid
/// "no data" outcome for symbols without enough history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolAnalysis {
    /// Exchange-canonical symbol.
    pub symbol: String,
    pub timeframes: TimeframeResults,
    pub consensus: Option<Consensus>,
    pub open_interest: Option<OiAssessment>,
    pub risk: Option<RiskAlertSet>,
    pub recommendation: Option<Recommendation>,
    pub price_levels: Option<PriceLevelPlan>,
    /// Unix timestamp (milliseconds) when computed.
    pub timestamp: i64,
}

impl SymbolAnalysis {
    /// Analysis with no usable timeframe.
    pub fn no_data(symbol: String) -> Self {
        Self {
            symbol,
            timeframes: TimeframeResults::new(),
            consensus: None,
            open_interest: None,
            risk: None,
            recommendation: None,
            price_levels: None,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn has_data(&self) -> bool {
        !self.timeframes.is_empty()
    }
}

/// Single-timeframe (15m) trend plus open interest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAnalysis {
    pub symbol: String,
    pub trend: Option<TrendAssessment>,
    pub open_interest: Option<OiAssessment>,
    pub timestamp: i64,
}

/// Direction of the last candle-to-candle move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceDirection {
    Up,
    Down,
    Flat,
}

/// Latest price with the change since the previous 5m close.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    pub symbol: String,
    pub price: f64,
    pub previous_close: f64,
    pub change_pct: f64,
    pub direction: PriceDirection,
    pub timestamp: i64,
}
