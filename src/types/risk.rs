use crate::types::TrendDirection;
use serde::{Deserialize, Serialize};

/// Severity bucket for a risk alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Contribution of one alert of this severity to the risk score.
    pub fn weight(&self) -> u32 {
        match self {
            Severity::Critical => 4,
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }
}

/// Which heuristic raised the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskAlertKind {
    ExtremeRsiCluster,
    RsiCluster,
    RsiOverboughtDrift,
    RsiOversoldDrift,
    OiBearishDivergence,
    OiBullishDivergence,
    OiBearishConfirmation,
    OiBullishConfirmation,
    HighVolatility,
    ElevatedVolatility,
    WeakTrend,
    OverextendedTrend,
    TimeframeAlignment,
    TimeframeConflict,
    BullTrap,
    Capitulation,
}

/// A single alert message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub kind: RiskAlertKind,
    pub message: String,
}

impl RiskAlert {
    pub fn new(kind: RiskAlertKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Alerts grouped by severity plus the aggregate readings they were built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAlertSet {
    pub critical: Vec<RiskAlert>,
    pub high: Vec<RiskAlert>,
    pub medium: Vec<RiskAlert>,
    pub low: Vec<RiskAlert>,
    pub avg_rsi: f64,
    pub timeframes_analyzed: usize,
    pub consensus: TrendDirection,
}

impl RiskAlertSet {
    pub fn new(avg_rsi: f64, timeframes_analyzed: usize, consensus: TrendDirection) -> Self {
        Self {
            critical: Vec::new(),
            high: Vec::new(),
            medium: Vec::new(),
            low: Vec::new(),
            avg_rsi,
            timeframes_analyzed,
            consensus,
        }
    }

    /// Append an alert to its severity bucket.
    pub fn push(&mut self, severity: Severity, alert: RiskAlert) {
        match severity {
            Severity::Critical => self.critical.push(alert),
            Severity::High => self.high.push(alert),
            Severity::Medium => self.medium.push(alert),
            Severity::Low => self.low.push(alert),
        }
    }

    pub fn bucket(&self, severity: Severity) -> &[RiskAlert] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::High => &self.high,
            Severity::Medium => &self.medium,
            Severity::Low => &self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.critical.len() + self.high.len() + self.medium.len() + self.low.len()
    }

    pub fn contains(&self, kind: RiskAlertKind) -> bool {
        [&self.critical, &self.high, &self.medium, &self.low]
            .iter()
            .any(|bucket| bucket.iter().any(|a| a.kind == kind))
    }
}
