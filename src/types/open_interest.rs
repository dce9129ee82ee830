use serde::{Deserialize, Serialize};

/// Open interest trend from regression slope and 24h change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OiTrend {
    StrongUp,
    Up,
    StrongDown,
    Down,
    Flat,
}

impl OiTrend {
    pub fn label(&self) -> &'static str {
        match self {
            OiTrend::StrongUp => "strong up",
            OiTrend::Up => "up",
            OiTrend::StrongDown => "strong down",
            OiTrend::Down => "down",
            OiTrend::Flat => "flat",
        }
    }

    pub fn is_rising(&self) -> bool {
        matches!(self, OiTrend::StrongUp | OiTrend::Up)
    }

    pub fn is_falling(&self) -> bool {
        matches!(self, OiTrend::StrongDown | OiTrend::Down)
    }
}

/// Relationship between 24h price change and 24h open interest change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceOiDivergence {
    /// Price up, OI down: rally unsupported by new positions.
    BearishDivergence,
    /// Price down, OI down.
    BearishConfirmation,
    /// Price down, OI up: accumulation.
    BullishDivergence,
    /// Price up, OI up.
    BullishConfirmation,
    None,
}

impl PriceOiDivergence {
    pub fn label(&self) -> &'static str {
        match self {
            PriceOiDivergence::BearishDivergence => "bearish divergence (rally unsupported)",
            PriceOiDivergence::BearishConfirmation => "bearish confirmation",
            PriceOiDivergence::BullishDivergence => "bullish divergence (accumulation)",
            PriceOiDivergence::BullishConfirmation => "bullish confirmation",
            PriceOiDivergence::None => "none",
        }
    }
}

/// Direction of the 24h price move on the paired candle series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceMove {
    Up,
    Down,
    Flat,
}

impl PriceMove {
    /// Percent change beyond which a 24h move counts as directional.
    pub const THRESHOLD_PCT: f64 = 2.0;

    pub fn from_change_pct(change_pct: f64) -> Self {
        if change_pct > Self::THRESHOLD_PCT {
            PriceMove::Up
        } else if change_pct < -Self::THRESHOLD_PCT {
            PriceMove::Down
        } else {
            PriceMove::Flat
        }
    }
}

/// Open interest analysis for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OiAssessment {
    pub current_oi: f64,
    pub change_24h_pct: f64,
    pub price_change_24h_pct: f64,
    pub price_move: PriceMove,
    pub oi_slope: f64,
    pub trend: OiTrend,
    pub divergence: PriceOiDivergence,
    pub interpretation: String,
}
