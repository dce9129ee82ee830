//! Technical indicator implementations.
//!
//! Every indicator produces a series aligned 1:1 with the input candles.
//! Positions inside the warm-up window, or where a formula has a zero
//! denominator, are `None`.

pub mod adx;
pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use adx::{Adx, AdxSeries};
pub use atr::{true_range, Atr};
pub use ema::Ema;
pub use macd::{Macd, MacdSeries};
pub use rsi::Rsi;

pub use crate::types::IndicatorRow;

use crate::types::Candle;
use serde::Serialize;

/// Trait for indicators computed over a candle series.
pub trait Indicator {
    type Output;

    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Number of candles before the first defined value.
    fn min_periods(&self) -> usize;

    /// Compute the indicator series for `candles`.
    fn compute(&self, candles: &[Candle]) -> Self::Output;
}

/// Rolling sum over `window` values. A window containing any undefined value
/// is itself undefined.
pub fn rolling_sum(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    for end in (window - 1)..values.len() {
        out[end] = values[end + 1 - window..=end]
            .iter()
            .copied()
            .try_fold(0.0, |acc, v| v.map(|x| acc + x));
    }
    out
}

/// Simple rolling mean with the same undefined propagation as [`rolling_sum`].
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_sum(values, window)
        .into_iter()
        .map(|sum| sum.map(|s| s / window as f64))
        .collect()
}

/// Indicator arrays aligned with a candle series.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorFrame {
    pub ema9: Vec<Option<f64>>,
    pub ema21: Vec<Option<f64>>,
    pub ema50: Vec<Option<f64>>,
    pub ema200: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_histogram: Vec<Option<f64>>,
    pub atr: Vec<Option<f64>>,
    pub adx: Vec<Option<f64>>,
    pub plus_di: Vec<Option<f64>>,
    pub minus_di: Vec<Option<f64>>,
}

impl IndicatorFrame {
    /// Compute every indicator for the series.
    pub fn compute(candles: &[Candle]) -> Self {
        let macd = Macd::default().compute(candles);
        let adx = Adx::default().compute(candles);

        Self {
            ema9: Ema::new(9).compute(candles),
            ema21: Ema::new(21).compute(candles),
            ema50: Ema::new(50).compute(candles),
            ema200: Ema::new(200).compute(candles),
            rsi: Rsi::default().compute(candles),
            macd: macd.macd,
            macd_signal: macd.signal,
            macd_histogram: macd.histogram,
            atr: Atr::default().compute(candles),
            adx: adx.adx,
            plus_di: adx.plus_di,
            minus_di: adx.minus_di,
        }
    }

    pub fn len(&self) -> usize {
        self.ema9.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ema9.is_empty()
    }

    /// Values at `index`, or `None` when out of range.
    pub fn row(&self, index: usize) -> Option<IndicatorRow> {
        if index >= self.len() {
            return None;
        }
        Some(IndicatorRow {
            ema9: self.ema9[index],
            ema21: self.ema21[index],
            ema50: self.ema50[index],
            ema200: self.ema200[index],
            rsi: self.rsi[index],
            macd: self.macd[index],
            macd_signal: self.macd_signal[index],
            macd_histogram: self.macd_histogram[index],
            atr: self.atr[index],
            adx: self.adx[index],
            plus_di: self.plus_di[index],
            minus_di: self.minus_di[index],
        })
    }

    /// Values at the latest candle.
    pub fn latest(&self) -> Option<IndicatorRow> {
        self.row(self.len().checked_sub(1)?)
    }
}
