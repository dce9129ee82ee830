//! Average Directional Index (ADX) with the +DI / -DI lines.

use super::atr::true_ranges;
use super::{rolling_mean, rolling_sum, Indicator};
use crate::types::Candle;

/// ADX indicator.
///
/// Directional movement follows Wilder's exclusivity rule: on each candle at
/// most one of +DM / -DM is non-zero. DI lines are `100 * sum(DM) / sum(TR)`
/// over `period` candles and ADX is the simple mean of DX over `period`.
/// Any zero denominator yields an undefined value instead of a NaN.
pub struct Adx {
    period: usize,
}

impl Default for Adx {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// ADX, +DI and -DI aligned with the input candles.
#[derive(Debug, Clone, Default)]
pub struct AdxSeries {
    pub adx: Vec<Option<f64>>,
    pub plus_di: Vec<Option<f64>>,
    pub minus_di: Vec<Option<f64>>,
}

/// +DM and -DM for one candle relative to the previous one.
fn directional_movement(current: &Candle, previous: &Candle) -> (f64, f64) {
    let up_move = current.high - previous.high;
    let down_move = previous.low - current.low;

    let plus_dm = if up_move > down_move && up_move > 0.0 {
        up_move
    } else {
        0.0
    };
    let minus_dm = if down_move > up_move && down_move > 0.0 {
        down_move
    } else {
        0.0
    };

    (plus_dm, minus_dm)
}

fn directional_index(dm_sum: Option<f64>, tr_sum: Option<f64>) -> Option<f64> {
    match (dm_sum, tr_sum) {
        (Some(dm), Some(tr)) if tr > 0.0 => Some(100.0 * dm / tr),
        _ => None,
    }
}

impl Indicator for Adx {
    type Output = AdxSeries;

    fn id(&self) -> &str {
        "adx"
    }

    fn min_periods(&self) -> usize {
        self.period * 2
    }

    fn compute(&self, candles: &[Candle]) -> Self::Output {
        let mut plus_dm = Vec::with_capacity(candles.len());
        let mut minus_dm = Vec::with_capacity(candles.len());

        for i in 0..candles.len() {
            if i == 0 {
                plus_dm.push(None);
                minus_dm.push(None);
                continue;
            }
            let (plus, minus) = directional_movement(&candles[i], &candles[i - 1]);
            plus_dm.push(Some(plus));
            minus_dm.push(Some(minus));
        }

        let tr_sum = rolling_sum(&true_ranges(candles), self.period);
        let plus_sum = rolling_sum(&plus_dm, self.period);
        let minus_sum = rolling_sum(&minus_dm, self.period);

        let plus_di: Vec<Option<f64>> = plus_sum
            .iter()
            .zip(tr_sum.iter())
            .map(|(&dm, &tr)| directional_index(dm, tr))
            .collect();
        let minus_di: Vec<Option<f64>> = minus_sum
            .iter()
            .zip(tr_sum.iter())
            .map(|(&dm, &tr)| directional_index(dm, tr))
            .collect();

        let dx: Vec<Option<f64>> = plus_di
            .iter()
            .zip(minus_di.iter())
            .map(|(&p, &m)| match (p, m) {
                (Some(p), Some(m)) if p + m > 0.0 => Some(100.0 * (p - m).abs() / (p + m)),
                _ => None,
            })
            .collect();

        AdxSeries {
            adx: rolling_mean(&dx, self.period),
            plus_di,
            minus_di,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::*;

    #[test]
    fn test_directional_movement_exclusive() {
        let prev = Candle {
            timestamp: 0,
            open: 10.0,
            high: 11.0,
            low: 9.0,
            close: 10.0,
            volume: 0.0,
        };
        // Outside bar: both moves positive, only the larger one counts.
        let outside = Candle {
            timestamp: 1,
            open: 10.0,
            high: 13.0,
            low: 8.0,
            close: 12.0,
            volume: 0.0,
        };
        assert_eq!(directional_movement(&outside, &prev), (2.0, 0.0));

        // Equal moves cancel out.
        let symmetric = Candle {
            high: 12.0,
            low: 8.0,
            ..outside
        };
        assert_eq!(directional_movement(&symmetric, &prev), (0.0, 0.0));
    }

    #[test]
    fn test_adx_warmup() {
        let candles = create_uptrend_candles(40);
        let series = Adx::default().compute(&candles);
        assert!(series.plus_di[..14].iter().all(|v| v.is_none()));
        assert!(series.plus_di[14].is_some());
        assert!(series.adx[..27].iter().all(|v| v.is_none()));
        assert!(series.adx[27].is_some());
    }

    #[test]
    fn test_adx_uptrend_directional_lines() {
        let candles = create_uptrend_candles(40);
        let series = Adx::default().compute(&candles);
        let plus = series.plus_di.last().unwrap().unwrap();
        let minus = series.minus_di.last().unwrap().unwrap();
        let adx = series.adx.last().unwrap().unwrap();
        assert!((plus - 50.0).abs() < 1e-9);
        assert_eq!(minus, 0.0);
        assert!((adx - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_adx_downtrend_directional_lines() {
        let candles = create_downtrend_candles(40);
        let series = Adx::default().compute(&candles);
        let plus = series.plus_di.last().unwrap().unwrap();
        let minus = series.minus_di.last().unwrap().unwrap();
        assert_eq!(plus, 0.0);
        assert!(minus > 0.0);
    }

    #[test]
    fn test_adx_flat_series_undefined() {
        let candles = create_flat_candles(40, 25.0);
        let series = Adx::default().compute(&candles);
        assert!(series.plus_di.iter().all(|v| v.is_none()));
        assert!(series.adx.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_adx_short_series() {
        let series = Adx::default().compute(&create_uptrend_candles(5));
        assert_eq!(series.adx.len(), 5);
        assert!(series.adx.iter().all(|v| v.is_none()));
    }
}
