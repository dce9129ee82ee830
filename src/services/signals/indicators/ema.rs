//! Exponential Moving Average (EMA) indicator.

use super::Indicator;
use crate::types::Candle;

/// EMA (Exponential Moving Average) indicator.
///
/// Recursive smoothing with `alpha = 2 / (span + 1)`, seeded with the first
/// close, so every position of the output is defined.
pub struct Ema {
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self { span }
    }
}

/// EMA over an arbitrary value series, seeded with the first value.
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut iter = values.iter();

    if let Some(&first) = iter.next() {
        out.push(first);
        let mut prev = first;
        for &value in iter {
            prev = alpha * value + (1.0 - alpha) * prev;
            out.push(prev);
        }
    }

    out
}

impl Indicator for Ema {
    type Output = Vec<Option<f64>>;

    fn id(&self) -> &str {
        match self.span {
            9 => "ema9",
            21 => "ema21",
            50 => "ema50",
            200 => "ema200",
            _ => "ema",
        }
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn compute(&self, candles: &[Candle]) -> Self::Output {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        ema_series(&closes, self.span).into_iter().map(Some).collect()
    }
}
