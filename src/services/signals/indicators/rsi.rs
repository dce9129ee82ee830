//! Relative Strength Index (RSI) indicator.

use super::{rolling_mean, Indicator};
use crate::types::Candle;

/// RSI (Relative Strength Index) indicator.
///
/// Average gain and average loss are simple rolling means of the last
/// `period` close-to-close changes, not Wilder's recursive smoothing. The
/// 70/30 and 85/15 thresholds used downstream are tuned against this variant.
///
/// - Below 30: Oversold
/// - Above 70: Overbought
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    /// RSI from average gain and loss. Undefined when both are zero.
    fn from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
        if avg_loss == 0.0 {
            if avg_gain == 0.0 {
                return None;
            }
            return Some(100.0);
        }

        let rs = avg_gain / avg_loss;
        Some(100.0 - (100.0 / (1.0 + rs)))
    }
}

impl Indicator for Rsi {
    type Output = Vec<Option<f64>>;

    fn id(&self) -> &str {
        "rsi"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, candles: &[Candle]) -> Self::Output {
        let mut gains = Vec::with_capacity(candles.len());
        let mut losses = Vec::with_capacity(candles.len());

        for i in 0..candles.len() {
            // No previous close, so the first full window ends at index `period`.
            if i == 0 {
                gains.push(None);
                losses.push(None);
                continue;
            }
            let change = candles[i].close - candles[i - 1].close;
            gains.push(Some(change.max(0.0)));
            losses.push(Some((-change).max(0.0)));
        }

        let avg_gain = rolling_mean(&gains, self.period);
        let avg_loss = rolling_mean(&losses, self.period);

        avg_gain
            .into_iter()
            .zip(avg_loss)
            .map(|(gain, loss)| match (gain, loss) {
                (Some(g), Some(l)) => Self::from_averages(g, l),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::*;

    #[test]
    fn test_rsi_id_and_min_periods() {
        let rsi = Rsi::default();
        assert_eq!(rsi.id(), "rsi");
        assert_eq!(rsi.min_periods(), 15);
    }

    #[test]
    fn test_rsi_warmup_undefined() {
        let candles = create_uptrend_candles(20);
        let rsi = Rsi::default().compute(&candles);
        assert!(rsi[..14].iter().all(|v| v.is_none()));
        assert!(rsi[14].is_some());
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let candles = create_uptrend_candles(10);
        let rsi = Rsi::default().compute(&candles);
        assert!(rsi.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        let candles = create_uptrend_candles(30);
        let rsi = Rsi::default().compute(&candles);
        assert_eq!(rsi.last().unwrap(), &Some(100.0));
    }

    #[test]
    fn test_rsi_downtrend_is_zero() {
        let candles = create_downtrend_candles(30);
        let rsi = Rsi::default().compute(&candles);
        assert_eq!(rsi.last().unwrap(), &Some(0.0));
    }

    #[test]
    fn test_rsi_flat_series_undefined() {
        let candles = create_flat_candles(30, 10.0);
        let rsi = Rsi::default().compute(&candles);
        assert!(rsi.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_rsi_simple_average_variant() {
        // Alternate +2 / -1 moves: over any 14 changes gains sum to 14, losses to 7.
        let mut close = 100.0;
        let candles: Vec<Candle> = (0..40)
            .map(|i| {
                if i > 0 {
                    close += if i % 2 == 1 { 2.0 } else { -1.0 };
                }
                Candle {
                    timestamp: i as i64,
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 1.0,
                }
            })
            .collect();
        let rsi = Rsi::default().compute(&candles);
        let last = rsi.last().unwrap().unwrap();
        let expected = 100.0 - 100.0 / (1.0 + 2.0);
        assert!((last - expected).abs() < 1e-9, "got {}", last);
    }

    #[test]
    fn test_rsi_value_range() {
        let mut candles = create_uptrend_candles(30);
        candles.extend(create_downtrend_candles(30).into_iter().map(|mut c| {
            c.timestamp += 10_000_000;
            c
        }));
        for value in Rsi::default().compute(&candles).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }
}
