//! Recommendation synthesis from a risk alert set.

use crate::types::{
    Recommendation, RecommendationAction, RiskAlertKind, RiskAlertSet, Severity, TradeBias,
    TrendDirection,
};

/// Highest risk score that still counts as low risk.
const LOW_RISK_SCORE: u32 = 3;

/// Weighted alert count: 4 per critical, 3 per high, 2 per medium, 1 per low.
pub fn risk_score(alerts: &RiskAlertSet) -> u32 {
    [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ]
    .iter()
    .map(|&severity| severity.weight() * alerts.bucket(severity).len() as u32)
    .sum()
}

fn bias(action: RecommendationAction, consensus: TrendDirection, avg_rsi: f64) -> TradeBias {
    match (action, consensus) {
        (RecommendationAction::DoNotTrade, _) => TradeBias::Flat,
        (RecommendationAction::ExtremeCaution, TrendDirection::Bullish) if avg_rsi > 75.0 => {
            TradeBias::ContrarianShortOrFlat
        }
        (RecommendationAction::ExtremeCaution, TrendDirection::Bearish) if avg_rsi < 25.0 => {
            TradeBias::ContrarianLongOrFlat
        }
        (RecommendationAction::ExtremeCaution, _) => TradeBias::Flat,
        (RecommendationAction::TradeWithCaution, TrendDirection::Bullish) => {
            TradeBias::LongReducedSize
        }
        (RecommendationAction::TradeWithCaution, TrendDirection::Bearish) => {
            TradeBias::ShortReducedSize
        }
        (RecommendationAction::Favorable, TrendDirection::Bullish) => TradeBias::Long,
        (RecommendationAction::Favorable, TrendDirection::Bearish) => TradeBias::Short,
        (_, TrendDirection::Neutral) => TradeBias::Range,
    }
}

fn reason(action: RecommendationAction, alerts: &RiskAlertSet) -> String {
    match action {
        RecommendationAction::DoNotTrade => format!(
            "{} critical and {} high risk alerts: conditions too dangerous to enter",
            alerts.critical.len(),
            alerts.high.len()
        ),
        RecommendationAction::ExtremeCaution => {
            "Significant risk signals: only counter-trend setups or no position".to_string()
        }
        RecommendationAction::TradeWithCaution => {
            "Moderate risk: trade with the trend using reduced size and tight stops".to_string()
        }
        RecommendationAction::Favorable => {
            "Low risk environment: conditions support trading the trend".to_string()
        }
    }
}

/// Independent textual triggers, in order.
fn specific_recommendations(alerts: &RiskAlertSet, score: u32) -> Vec<String> {
    let mut out = Vec::new();

    if alerts.avg_rsi > 80.0 {
        out.push(
            "RSI overbought across timeframes: avoid new longs, wait for a pullback".to_string(),
        );
    }
    if alerts.avg_rsi < 20.0 {
        out.push(
            "RSI oversold across timeframes: avoid new shorts, watch for a bounce".to_string(),
        );
    }
    if alerts.consensus != TrendDirection::Neutral && score <= LOW_RISK_SCORE {
        out.push(format!(
            "Clear {} consensus with low risk: follow the trend with standard stops",
            alerts.consensus.label()
        ));
    }
    if alerts.contains(RiskAlertKind::OiBearishDivergence) {
        out.push(
            "Open interest does not confirm the rally: tighten stops on longs".to_string(),
        );
    }

    out
}

/// Map a risk alert set to an action, bias and advice.
pub fn recommend(alerts: &RiskAlertSet) -> Recommendation {
    let score = risk_score(alerts);
    let action = RecommendationAction::from_risk_score(score);

    Recommendation {
        action,
        reason: reason(action, alerts),
        bias: bias(action, alerts.consensus, alerts.avg_rsi),
        risk_score: score,
        specific_recommendations: specific_recommendations(alerts, score),
    }
}
