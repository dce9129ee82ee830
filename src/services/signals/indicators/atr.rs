//! Average True Range (ATR) indicator.

use super::{rolling_mean, Indicator};
use crate::types::Candle;

/// True Range: max(High-Low, |High-PrevClose|, |Low-PrevClose|).
///
/// The first candle has no previous close and uses High-Low alone.
pub fn true_range(current: &Candle, previous: Option<&Candle>) -> f64 {
    let hl = current.high - current.low;
    match previous {
        Some(prev) => {
            let hc = (current.high - prev.close).abs();
            let lc = (current.low - prev.close).abs();
            hl.max(hc).max(lc)
        }
        None => hl,
    }
}

/// True range for every candle of the series.
pub fn true_ranges(candles: &[Candle]) -> Vec<Option<f64>> {
    candles
        .iter()
        .enumerate()
        .map(|(i, c)| Some(true_range(c, i.checked_sub(1).map(|p| &candles[p]))))
        .collect()
}

/// ATR (Average True Range) indicator.
///
/// Simple rolling mean of the true range over `period` candles.
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Indicator for Atr {
    type Output = Vec<Option<f64>>;

    fn id(&self) -> &str {
        "atr"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Self::Output {
        rolling_mean(&true_ranges(candles), self.period)
    }
}
