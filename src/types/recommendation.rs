use serde::{Deserialize, Serialize};

/// Trade action tier derived from the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationAction {
    DoNotTrade,
    ExtremeCaution,
    TradeWithCaution,
    Favorable,
}

impl RecommendationAction {
    pub fn from_risk_score(score: u32) -> Self {
        match score {
            s if s >= 10 => RecommendationAction::DoNotTrade,
            s if s >= 7 => RecommendationAction::ExtremeCaution,
            s if s >= 4 => RecommendationAction::TradeWithCaution,
            _ => RecommendationAction::Favorable,
        }
    }

    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationAction::DoNotTrade => "Do not trade",
            RecommendationAction::ExtremeCaution => "Extreme caution",
            RecommendationAction::TradeWithCaution => "Trade with caution",
            RecommendationAction::Favorable => "Favorable conditions",
        }
    }
}

/// Positioning bias attached to the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeBias {
    /// Bullish crowd with stretched RSI: only shorts or no position.
    ContrarianShortOrFlat,
    /// Bearish crowd with washed-out RSI: only longs or no position.
    ContrarianLongOrFlat,
    LongReducedSize,
    ShortReducedSize,
    Long,
    Short,
    /// No directional consensus, trade the range only.
    Range,
    /// Stay out until signals confirm.
    Flat,
}

impl TradeBias {
    pub fn label(&self) -> &'static str {
        match self {
            TradeBias::ContrarianShortOrFlat => "Contrarian: short or flat",
            TradeBias::ContrarianLongOrFlat => "Contrarian: long or flat",
            TradeBias::LongReducedSize => "Long with reduced size",
            TradeBias::ShortReducedSize => "Short with reduced size",
            TradeBias::Long => "Long",
            TradeBias::Short => "Short",
            TradeBias::Range => "Range trading",
            TradeBias::Flat => "Flat, awaiting confirmation",
        }
    }
}

/// Final trade recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub action: RecommendationAction,
    pub reason: String,
    pub bias: TradeBias,
    pub risk_score: u32,
    pub specific_recommendations: Vec<String>,
}
