//! Entry, stop-loss and take-profit planning.
//!
//! Support and resistance bands come from percentiles of the last
//! [`LEVELS_WINDOW`] candles. Directional plans retrace toward the extreme of
//! the last [`SWING_WINDOW`] candles and size targets as multiples of the
//! distance to the stop.

use crate::services::signals::indicators::{IndicatorFrame, IndicatorRow};
use crate::types::{
    Candle, EntryTiers, PlanKind, PriceBands, PriceLevelPlan, RiskRewardRatios, TakeProfitTiers,
    TrendDirection,
};

/// Candles used for support and resistance bands.
pub const LEVELS_WINDOW: usize = 50;

/// Candles used for the recent swing high/low.
const SWING_WINDOW: usize = 10;

const FIB_HALF: f64 = 0.5;
const FIB_GOLDEN: f64 = 0.618;

/// Stop buffer beyond the swing, in ATRs.
const STOP_BUFFER_ATR: f64 = 0.5;
/// Widest allowed stop, in ATRs.
const MAX_STOP_ATR: f64 = 2.0;

const TP1_RISK_MULTIPLE: f64 = 1.5;
const TP2_RISK_MULTIPLE: f64 = 2.5;
const TP3_RISK_MULTIPLE: f64 = 4.0;

/// Linear-interpolated percentile (`pct` in 0..=100) of `values`.
pub fn percentile(values: &[f64], pct: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (pct / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

fn resistance_bands(highs: &[f64]) -> Option<PriceBands> {
    Some(PriceBands {
        near: percentile(highs, 90.0)?,
        far: percentile(highs, 95.0)?,
        extreme: highs.iter().copied().reduce(f64::max)?,
    })
}

fn support_bands(lows: &[f64]) -> Option<PriceBands> {
    Some(PriceBands {
        near: percentile(lows, 10.0)?,
        far: percentile(lows, 5.0)?,
        extreme: lows.iter().copied().reduce(f64::min)?,
    })
}

fn range_plan(current_price: f64, resistance: PriceBands, support: PriceBands) -> PriceLevelPlan {
    PriceLevelPlan {
        kind: PlanKind::Range,
        current_price,
        entries: None,
        stop_loss: None,
        take_profits: None,
        risk_reward: None,
        resistance,
        support,
    }
}

/// Plan levels for `direction` from the latest candles.
///
/// `row` supplies EMA21/EMA50 for the pullback entries. Returns `None` with
/// fewer than [`LEVELS_WINDOW`] candles. A directional plan whose stop ends
/// up on the wrong side of price falls back to a range plan.
pub fn plan_levels(
    candles: &[Candle],
    row: &IndicatorRow,
    current_price: f64,
    direction: TrendDirection,
    atr: f64,
) -> Option<PriceLevelPlan> {
    if candles.len() < LEVELS_WINDOW {
        return None;
    }

    let recent = &candles[candles.len() - LEVELS_WINDOW..];
    let highs: Vec<f64> = recent.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = recent.iter().map(|c| c.low).collect();
    let resistance = resistance_bands(&highs)?;
    let support = support_bands(&lows)?;

    let swing = &recent[recent.len() - SWING_WINDOW..];

    let plan = match direction {
        TrendDirection::Bullish => {
            let swing_low = swing.iter().map(|c| c.low).reduce(f64::min)?;
            let fib_half = current_price - (current_price - swing_low) * FIB_HALF;
            let fib_golden = current_price - (current_price - swing_low) * FIB_GOLDEN;
            let stop_loss = (swing_low - STOP_BUFFER_ATR * atr).max(current_price - MAX_STOP_ATR * atr);
            let risk = current_price - stop_loss;
            if risk <= 0.0 {
                return Some(range_plan(current_price, resistance, support));
            }

            let take_profits = TakeProfitTiers {
                tp1: current_price + TP1_RISK_MULTIPLE * risk,
                tp2: current_price + TP2_RISK_MULTIPLE * risk,
                tp3: resistance
                    .near
                    .min(current_price + TP3_RISK_MULTIPLE * risk),
            };

            PriceLevelPlan {
                kind: PlanKind::Long,
                current_price,
                entries: Some(EntryTiers {
                    aggressive: current_price,
                    moderate: row.ema21.map_or(fib_half, |ema| ema.min(fib_half)),
                    conservative: row.ema50.map_or(fib_golden, |ema| ema.min(fib_golden)),
                }),
                stop_loss: Some(stop_loss),
                risk_reward: Some(RiskRewardRatios {
                    tp1: (take_profits.tp1 - current_price) / risk,
                    tp2: (take_profits.tp2 - current_price) / risk,
                    tp3: (take_profits.tp3 - current_price) / risk,
                }),
                take_profits: Some(take_profits),
                resistance,
                support,
            }
        }
        TrendDirection::Bearish => {
            let swing_high = swing.iter().map(|c| c.high).reduce(f64::max)?;
            let fib_half = current_price + (swing_high - current_price) * FIB_HALF;
            let fib_golden = current_price + (swing_high - current_price) * FIB_GOLDEN;
            let stop_loss = (swing_high + STOP_BUFFER_ATR * atr).min(current_price + MAX_STOP_ATR * atr);
            let risk = stop_loss - current_price;
            if risk <= 0.0 {
                return Some(range_plan(current_price, resistance, support));
            }

            let take_profits = TakeProfitTiers {
                tp1: current_price - TP1_RISK_MULTIPLE * risk,
                tp2: current_price - TP2_RISK_MULTIPLE * risk,
                tp3: support.near.max(current_price - TP3_RISK_MULTIPLE * risk),
            };

            PriceLevelPlan {
                kind: PlanKind::Short,
                current_price,
                entries: Some(EntryTiers {
                    aggressive: current_price,
                    moderate: row.ema21.map_or(fib_half, |ema| ema.max(fib_half)),
                    conservative: row.ema50.map_or(fib_golden, |ema| ema.max(fib_golden)),
                }),
                stop_loss: Some(stop_loss),
                risk_reward: Some(RiskRewardRatios {
                    tp1: (current_price - take_profits.tp1) / risk,
                    tp2: (current_price - take_profits.tp2) / risk,
                    tp3: (current_price - take_profits.tp3) / risk,
                }),
                take_profits: Some(take_profits),
                resistance,
                support,
            }
        }
        TrendDirection::Neutral => range_plan(current_price, resistance, support),
    };

    Some(plan)
}

/// Plan levels at the latest candle of `candles`, using its close as the
/// current price and its ATR. `None` when the latest ATR is undefined.
pub fn plan_for_series(candles: &[Candle], direction: TrendDirection) -> Option<PriceLevelPlan> {
    if candles.len() < LEVELS_WINDOW {
        return None;
    }
    let frame = IndicatorFrame::compute(candles);
    let row = frame.latest()?;
    let current_price = candles.last()?.close;

    plan_levels(candles, &row, current_price, direction, row.atr?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::*;

    #[test]
    fn test_percentile_interpolation() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 50.0), Some(3.0));
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 100.0), Some(5.0));
        // rank 0.9 * 4 = 3.6
        assert!((percentile(&values, 90.0).unwrap() - 4.6).abs() < 1e-12);
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_requires_fifty_candles() {
        let candles = create_uptrend_candles(49);
        assert!(plan_for_series(&candles, TrendDirection::Bullish).is_none());
        assert!(plan_for_series(&create_uptrend_candles(50), TrendDirection::Bullish).is_some());
    }

    #[test]
    fn test_long_plan() {
        let candles = create_uptrend_candles(60);
        let plan = plan_for_series(&candles, TrendDirection::Bullish).unwrap();

        // Close 189.5, ATR 3, lowest low of the last 10 candles 174.
        assert_eq!(plan.kind, PlanKind::Long);
        assert_eq!(plan.current_price, 189.5);
        let stop = plan.stop_loss.unwrap();
        assert!((stop - 183.5).abs() < 1e-9);

        let tp = plan.take_profits.unwrap();
        assert!((tp.tp1 - 198.5).abs() < 1e-9);
        assert!((tp.tp2 - 204.5).abs() < 1e-9);
        assert!(tp.tp3 <= plan.resistance.near);

        let rr = plan.risk_reward.unwrap();
        assert!((rr.tp1 - 1.5).abs() < 1e-9);
        assert!((rr.tp2 - 2.5).abs() < 1e-9);

        let entries = plan.entries.unwrap();
        assert_eq!(entries.aggressive, 189.5);
        assert!(entries.moderate < entries.aggressive);
        assert!(entries.conservative <= entries.moderate);
    }

    #[test]
    fn test_short_plan_mirrors_long() {
        let candles = create_downtrend_candles(60);
        let plan = plan_for_series(&candles, TrendDirection::Bearish).unwrap();

        assert_eq!(plan.kind, PlanKind::Short);
        let stop = plan.stop_loss.unwrap();
        assert!(stop > plan.current_price);

        let tp = plan.take_profits.unwrap();
        assert!(tp.tp1 < plan.current_price);
        assert!(tp.tp2 < tp.tp1);
        assert!(tp.tp3 >= plan.support.near);

        let rr = plan.risk_reward.unwrap();
        assert!((rr.tp1 - 1.5).abs() < 1e-9);

        let entries = plan.entries.unwrap();
        assert!(entries.moderate > entries.aggressive);
        assert!(entries.conservative >= entries.moderate);
    }

    #[test]
    fn test_neutral_bands_only() {
        let candles = create_uptrend_candles(60);
        let plan = plan_for_series(&candles, TrendDirection::Neutral).unwrap();

        assert_eq!(plan.kind, PlanKind::Range);
        assert!(plan.entries.is_none());
        assert!(plan.stop_loss.is_none());
        assert!(plan.take_profits.is_none());
        assert!(plan.resistance.extreme >= plan.resistance.far);
        assert!(plan.resistance.far >= plan.resistance.near);
        assert!(plan.support.extreme <= plan.support.far);
        assert!(plan.support.far <= plan.support.near);
    }

    #[test]
    fn test_zero_risk_falls_back_to_range() {
        let candles = create_flat_candles(60, 10.0);
        let plan = plan_for_series(&candles, TrendDirection::Bullish).unwrap();
        assert_eq!(plan.kind, PlanKind::Range);
        assert_eq!(plan.support.extreme, 10.0);
    }
}
