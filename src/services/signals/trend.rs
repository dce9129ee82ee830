//! Trend classification for a single timeframe.
//!
//! Reads the latest row of an [`IndicatorFrame`] and turns it into a
//! [`TrendAssessment`]. Series shorter than [`MIN_TREND_CANDLES`] produce no
//! assessment at all.

use crate::services::signals::indicators::{IndicatorFrame, IndicatorRow};
use crate::types::{
    AdxStrength, Candle, DiDirection, MacdSignal, RsiSignal, TrendAssessment, TrendLabel,
};

/// Minimum candles required before a trend is reported.
pub const MIN_TREND_CANDLES: usize = 50;

/// `a > b`, false when either side is undefined.
fn above(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

/// Count of bullish EMA alignments, 0 to 5.
pub fn ema_score(close: f64, row: &IndicatorRow) -> u8 {
    let close = Some(close);
    [
        above(close, row.ema9),
        above(close, row.ema21),
        above(close, row.ema50),
        above(row.ema9, row.ema21),
        above(row.ema21, row.ema50),
    ]
    .iter()
    .filter(|&&hit| hit)
    .count() as u8
}

fn macd_signal(row: &IndicatorRow) -> MacdSignal {
    match (row.macd, row.macd_signal) {
        (Some(m), Some(s)) if m > s => MacdSignal::Bullish,
        (Some(m), Some(s)) if m < s => MacdSignal::Bearish,
        _ => MacdSignal::Neutral,
    }
}

/// Classify one candle against its indicator row.
pub fn classify_trend(candle: &Candle, row: &IndicatorRow) -> TrendAssessment {
    let score = ema_score(candle.close, row);
    let di_direction = DiDirection::from_values(row.plus_di, row.minus_di);

    TrendAssessment {
        label: TrendLabel::from_components(score, di_direction),
        current_price: candle.close,
        ema_score: score,
        macd_signal: macd_signal(row),
        rsi_value: row.rsi,
        rsi_signal: row.rsi.map(RsiSignal::from_value),
        adx_value: row.adx,
        adx_strength: AdxStrength::from_value(row.adx),
        di_direction,
        atr_value: row.atr,
        volume: candle.volume,
        indicators: *row,
    }
}

/// Assess the trend at the latest candle of `candles`.
///
/// Returns `None` for series shorter than [`MIN_TREND_CANDLES`].
pub fn assess_trend(candles: &[Candle]) -> Option<TrendAssessment> {
    if candles.len() < MIN_TREND_CANDLES {
        return None;
    }

    let frame = IndicatorFrame::compute(candles);
    let row = frame.latest()?;
    let candle = candles.last()?;

    Some(classify_trend(candle, &row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::*;

    #[test]
    fn test_short_series_has_no_trend() {
        for len in [0, 1, 20, 49] {
            assert!(assess_trend(&create_uptrend_candles(len)).is_none());
        }
        assert!(assess_trend(&create_uptrend_candles(50)).is_some());
    }

    #[test]
    fn test_rising_series_is_strong_bullish() {
        let candles = create_uptrend_candles(60);
        let trend = assess_trend(&candles).unwrap();

        assert_eq!(trend.ema_score, 5);
        assert_eq!(trend.di_direction, DiDirection::Bullish);
        assert_eq!(trend.label, TrendLabel::StrongBullish);
        assert_eq!(trend.macd_signal, MacdSignal::Bullish);
        assert_eq!(trend.rsi_signal, Some(RsiSignal::Overbought));
        assert_eq!(trend.adx_strength, AdxStrength::Strong);
        assert_eq!(trend.current_price, candles[59].close);
        assert_eq!(trend.volume, 1000.0);

        let row = trend.indicators;
        assert_eq!(row.rsi, trend.rsi_value);
        assert_eq!(row.adx, trend.adx_value);
        assert_eq!(row.atr, trend.atr_value);
        assert!(row.ema9.unwrap() > row.ema21.unwrap());
        assert!(row.ema21.unwrap() > row.ema50.unwrap());
        assert!(row.macd_histogram.unwrap() > 0.0);
    }

    #[test]
    fn test_falling_series_is_strong_bearish() {
        let trend = assess_trend(&create_downtrend_candles(60)).unwrap();

        assert_eq!(trend.ema_score, 0);
        assert_eq!(trend.di_direction, DiDirection::Bearish);
        assert_eq!(trend.label, TrendLabel::StrongBearish);
        assert_eq!(trend.rsi_signal, Some(RsiSignal::Oversold));
    }

    #[test]
    fn test_flat_series_is_sideways() {
        let trend = assess_trend(&create_flat_candles(60, 10.0)).unwrap();

        assert_eq!(trend.ema_score, 0);
        assert_eq!(trend.di_direction, DiDirection::Neutral);
        assert_eq!(trend.label, TrendLabel::Sideways);
        assert_eq!(trend.macd_signal, MacdSignal::Neutral);
        assert!(trend.rsi_value.is_none());
        assert!(trend.rsi_signal.is_none());
        assert_eq!(trend.adx_strength, AdxStrength::Weak);
    }

    #[test]
    fn test_ema_score_ignores_undefined() {
        let row = IndicatorRow {
            ema9: Some(10.0),
            ema21: None,
            ema50: Some(8.0),
            ..Default::default()
        };
        // close > ema9 and close > ema50 only.
        assert_eq!(ema_score(11.0, &row), 2);
    }

    #[test]
    fn test_label_decision_table() {
        assert_eq!(
            TrendLabel::from_components(4, DiDirection::Bullish),
            TrendLabel::StrongBullish
        );
        assert_eq!(
            TrendLabel::from_components(3, DiDirection::Bullish),
            TrendLabel::Bullish
        );
        assert_eq!(
            TrendLabel::from_components(2, DiDirection::Bullish),
            TrendLabel::Sideways
        );
        assert_eq!(
            TrendLabel::from_components(1, DiDirection::Bearish),
            TrendLabel::StrongBearish
        );
        assert_eq!(
            TrendLabel::from_components(2, DiDirection::Bearish),
            TrendLabel::Bearish
        );
        assert_eq!(
            TrendLabel::from_components(3, DiDirection::Bearish),
            TrendLabel::Sideways
        );
        assert_eq!(
            TrendLabel::from_components(5, DiDirection::Neutral),
            TrendLabel::Sideways
        );
    }
}
