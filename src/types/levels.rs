use serde::{Deserialize, Serialize};

/// Kind of trade plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    Long,
    Short,
    Range,
}

/// Entry prices from most to least eager.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryTiers {
    pub aggressive: f64,
    pub moderate: f64,
    pub conservative: f64,
}

/// Three take-profit targets, nearest first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeProfitTiers {
    pub tp1: f64,
    pub tp2: f64,
    pub tp3: f64,
}

/// Reward-to-risk ratio for each take-profit target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRewardRatios {
    pub tp1: f64,
    pub tp2: f64,
    pub tp3: f64,
}

/// Percentile bands over recent highs (resistance) or lows (support).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBands {
    /// 90th percentile of highs, or 10th percentile of lows.
    pub near: f64,
    /// 95th percentile of highs, or 5th percentile of lows.
    pub far: f64,
    /// Maximum high, or minimum low.
    pub extreme: f64,
}

/// Entry, stop and target levels for the consensus direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLevelPlan {
    pub kind: PlanKind,
    pub current_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<EntryTiers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profits: Option<TakeProfitTiers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_reward: Option<RiskRewardRatios>,
    pub resistance: PriceBands,
    pub support: PriceBands,
}
