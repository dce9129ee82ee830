//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::ema_series;
use super::Indicator;
use crate::types::Candle;

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
///
/// All EMAs are seeded with their first input, so the lines are defined from
/// the first candle on.
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD line, signal line and histogram.
#[derive(Debug, Clone, Default)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

impl Indicator for Macd {
    type Output = MacdSeries;

    fn id(&self) -> &str {
        "macd"
    }

    fn min_periods(&self) -> usize {
        self.slow_period + self.signal_period
    }

    fn compute(&self, candles: &[Candle]) -> Self::Output {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

        let fast_ema = ema_series(&closes, self.fast_period);
        let slow_ema = ema_series(&closes, self.slow_period);

        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();
        let signal_line = ema_series(&macd_line, self.signal_period);

        let histogram = macd_line
            .iter()
            .zip(signal_line.iter())
            .map(|(m, s)| Some(m - s))
            .collect();

        MacdSeries {
            macd: macd_line.into_iter().map(Some).collect(),
            signal: signal_line.into_iter().map(Some).collect(),
            histogram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::*;

    #[test]
    fn test_macd_id_and_min_periods() {
        let macd = Macd::default();
        assert_eq!(macd.id(), "macd");
        assert_eq!(macd.min_periods(), 35);
    }

    #[test]
    fn test_macd_first_value_zero() {
        let candles = create_uptrend_candles(40);
        let series = Macd::default().compute(&candles);
        assert_eq!(series.macd[0], Some(0.0));
        assert_eq!(series.histogram[0], Some(0.0));
    }

    #[test]
    fn test_macd_bullish_in_uptrend() {
        let candles = create_uptrend_candles(60);
        let series = Macd::default().compute(&candles);
        let macd = series.macd.last().unwrap().unwrap();
        let signal = series.signal.last().unwrap().unwrap();
        assert!(macd > 0.0);
        assert!(macd > signal);
    }

    #[test]
    fn test_macd_histogram_identity() {
        let candles = create_downtrend_candles(50);
        let series = Macd::default().compute(&candles);
        for i in 0..candles.len() {
            let m = series.macd[i].unwrap();
            let s = series.signal[i].unwrap();
            let h = series.histogram[i].unwrap();
            assert!((h - (m - s)).abs() < 1e-12);
        }
    }
}
