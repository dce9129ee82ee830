use crate::types::Timeframe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Directional lean shared by consensus, risk and level planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl TrendDirection {
    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Bullish => "bullish",
            TrendDirection::Bearish => "bearish",
            TrendDirection::Neutral => "neutral",
        }
    }
}

/// Categorical trend state for one timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    StrongBullish,
    Bullish,
    StrongBearish,
    Bearish,
    Sideways,
}

impl TrendLabel {
    /// Decision table over EMA alignment and DI direction. First match wins.
    pub fn from_components(ema_score: u8, di_direction: DiDirection) -> Self {
        match (ema_score, di_direction) {
            (s, DiDirection::Bullish) if s >= 4 => TrendLabel::StrongBullish,
            (s, DiDirection::Bullish) if s >= 3 => TrendLabel::Bullish,
            (s, DiDirection::Bearish) if s <= 1 => TrendLabel::StrongBearish,
            (s, DiDirection::Bearish) if s <= 2 => TrendLabel::Bearish,
            _ => TrendLabel::Sideways,
        }
    }

    /// Direction bucket used for consensus voting.
    pub fn direction(&self) -> TrendDirection {
        match self {
            TrendLabel::StrongBullish | TrendLabel::Bullish => TrendDirection::Bullish,
            TrendLabel::StrongBearish | TrendLabel::Bearish => TrendDirection::Bearish,
            TrendLabel::Sideways => TrendDirection::Neutral,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendLabel::StrongBullish => "strong bullish",
            TrendLabel::Bullish => "bullish",
            TrendLabel::StrongBearish => "strong bearish",
            TrendLabel::Bearish => "bearish",
            TrendLabel::Sideways => "sideways/undefined",
        }
    }
}

/// MACD line position relative to its signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdSignal {
    Bullish,
    Bearish,
    Neutral,
}

/// RSI zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiSignal {
    Overbought,
    Oversold,
    Bullish,
    Bearish,
}

impl RsiSignal {
    pub fn from_value(rsi: f64) -> Self {
        if rsi > 70.0 {
            RsiSignal::Overbought
        } else if rsi < 30.0 {
            RsiSignal::Oversold
        } else if rsi > 50.0 {
            RsiSignal::Bullish
        } else {
            RsiSignal::Bearish
        }
    }
}

/// Trend strength bucket derived from ADX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdxStrength {
    Strong,
    Moderate,
    Weak,
}

impl AdxStrength {
    /// An undefined ADX counts as weak.
    pub fn from_value(adx: Option<f64>) -> Self {
        match adx {
            Some(v) if v > 25.0 => AdxStrength::Strong,
            Some(v) if v > 20.0 => AdxStrength::Moderate,
            _ => AdxStrength::Weak,
        }
    }
}

/// Which directional indicator dominates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiDirection {
    Bullish,
    Bearish,
    Neutral,
}

impl DiDirection {
    pub fn from_values(plus_di: Option<f64>, minus_di: Option<f64>) -> Self {
        match (plus_di, minus_di) {
            (Some(p), Some(m)) if p > m => DiDirection::Bullish,
            (Some(p), Some(m)) if m > p => DiDirection::Bearish,
            _ => DiDirection::Neutral,
        }
    }
}

/// Indicator values at one candle. `None` inside a warm-up window or where
/// a formula has a zero denominator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorRow {
    pub ema9: Option<f64>,
    pub ema21: Option<f64>,
    pub ema50: Option<f64>,
    pub ema200: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub atr: Option<f64>,
    pub adx: Option<f64>,
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,
}

/// Trend snapshot for one timeframe at its latest candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAssessment {
    pub label: TrendLabel,
    pub current_price: f64,
    /// EMA alignment score, 0 to 5.
    pub ema_score: u8,
    pub macd_signal: MacdSignal,
    /// `None` when RSI is indeterminate (no gains and no losses in the window).
    pub rsi_value: Option<f64>,
    pub rsi_signal: Option<RsiSignal>,
    pub adx_value: Option<f64>,
    pub adx_strength: AdxStrength,
    pub di_direction: DiDirection,
    pub atr_value: Option<f64>,
    pub volume: f64,
    /// Raw indicator values behind the assessment.
    pub indicators: IndicatorRow,
}

/// Per-timeframe trend assessments, iterated nearest timeframe first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeframeResults(BTreeMap<Timeframe, TrendAssessment>);

impl TimeframeResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, timeframe: Timeframe, assessment: TrendAssessment) {
        self.0.insert(timeframe, assessment);
    }

    /// First present entry in 5m, 15m, 1h, 4h order.
    pub fn nearest(&self) -> Option<(Timeframe, &TrendAssessment)> {
        self.0.iter().next().map(|(tf, a)| (*tf, a))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Timeframe, &TrendAssessment)> {
        self.0.iter().map(|(tf, a)| (*tf, a))
    }

    pub fn assessments(&self) -> impl Iterator<Item = &TrendAssessment> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Count of (bullish, bearish, other) labels.
    pub fn direction_counts(&self) -> (usize, usize, usize) {
        self.assessments()
            .fold((0, 0, 0), |(bull, bear, other), a| match a.label.direction() {
                TrendDirection::Bullish => (bull + 1, bear, other),
                TrendDirection::Bearish => (bull, bear + 1, other),
                TrendDirection::Neutral => (bull, bear, other + 1),
            })
    }
}

impl FromIterator<(Timeframe, TrendAssessment)> for TimeframeResults {
    fn from_iter<I: IntoIterator<Item = (Timeframe, TrendAssessment)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Worded agreement level across timeframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusLevel {
    StrongBullish,
    StrongBearish,
    ModerateBullish,
    ModerateBearish,
    NoConsensus,
}

impl ConsensusLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ConsensusLevel::StrongBullish => "strong bullish",
            ConsensusLevel::StrongBearish => "strong bearish",
            ConsensusLevel::ModerateBullish => "moderate bullish",
            ConsensusLevel::ModerateBearish => "moderate bearish",
            ConsensusLevel::NoConsensus => "no consensus",
        }
    }

    /// Suggested action for the consensus level.
    pub fn suggestion(&self) -> &'static str {
        match self {
            ConsensusLevel::StrongBullish => "Look for long entries on pullbacks",
            ConsensusLevel::StrongBearish => "Look for short entries on bounces",
            ConsensusLevel::ModerateBullish => {
                "Prefer longs, confirm on a lower timeframe"
            }
            ConsensusLevel::ModerateBearish => {
                "Prefer shorts, confirm on a lower timeframe"
            }
            ConsensusLevel::NoConsensus => "Wait for clear confirmation, trade the range",
        }
    }
}

/// Multi-timeframe consensus with the vote tally behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consensus {
    pub level: ConsensusLevel,
    pub bullish: usize,
    pub bearish: usize,
    pub sideways: usize,
    pub total: usize,
    /// Suggested action for the consensus level.
    pub suggestion: String,
}
