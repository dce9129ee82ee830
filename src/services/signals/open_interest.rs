//! Open interest trend and price/OI divergence analysis.

use crate::types::{
    Candle, OiAssessment, OiTrend, OpenInterestPoint, OpenInterestSnapshot, PriceMove,
    PriceOiDivergence,
};

/// Minimum OI history samples required for an assessment.
pub const MIN_OI_SAMPLES: usize = 20;

/// Samples back for the 24h comparison on hourly data.
const LOOKBACK_24H: usize = 24;

/// Samples used for the OI regression slope.
const SLOPE_WINDOW: usize = 12;

/// 24h change above which an OI trend counts as strong.
const STRONG_CHANGE_PCT: f64 = 5.0;

/// Percent change of the latest value against the value `lookback` samples
/// earlier, or against the oldest value when the series is shorter.
/// Zero when the reference value is zero.
pub fn change_pct(values: &[f64], lookback: usize) -> f64 {
    let (Some(&latest), Some(&oldest)) = (values.last(), values.first()) else {
        return 0.0;
    };
    let reference = values
        .len()
        .checked_sub(lookback + 1)
        .map(|i| values[i])
        .unwrap_or(oldest);

    if reference == 0.0 {
        return 0.0;
    }
    (latest - reference) / reference * 100.0
}

/// Least-squares slope of `values` against their index.
pub fn regression_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, &y)| {
            let dx = i as f64 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });

    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

fn classify_trend(slope: f64, change_24h_pct: f64) -> OiTrend {
    if slope > 0.0 && change_24h_pct > STRONG_CHANGE_PCT {
        OiTrend::StrongUp
    } else if slope > 0.0 && change_24h_pct > 0.0 {
        OiTrend::Up
    } else if slope < 0.0 && change_24h_pct < -STRONG_CHANGE_PCT {
        OiTrend::StrongDown
    } else if slope < 0.0 && change_24h_pct < 0.0 {
        OiTrend::Down
    } else {
        OiTrend::Flat
    }
}

/// Four-way price/OI rule with the same ±2% threshold on both axes.
pub fn classify_divergence(price_change_pct: f64, oi_change_pct: f64) -> PriceOiDivergence {
    let price = PriceMove::from_change_pct(price_change_pct);
    let oi = PriceMove::from_change_pct(oi_change_pct);

    match (price, oi) {
        (PriceMove::Up, PriceMove::Down) => PriceOiDivergence::BearishDivergence,
        (PriceMove::Down, PriceMove::Down) => PriceOiDivergence::BearishConfirmation,
        (PriceMove::Down, PriceMove::Up) => PriceOiDivergence::BullishDivergence,
        (PriceMove::Up, PriceMove::Up) => PriceOiDivergence::BullishConfirmation,
        _ => PriceOiDivergence::None,
    }
}

/// Human-readable reading of the OI picture. Divergence cases take priority
/// over the plain OI trend.
pub fn interpret(trend: OiTrend, divergence: PriceOiDivergence) -> &'static str {
    match divergence {
        PriceOiDivergence::BearishDivergence => {
            "Price rising while open interest falls: rally driven by closing shorts, not new longs"
        }
        PriceOiDivergence::BearishConfirmation => {
            "Price and open interest falling together: longs exiting, downtrend confirmed"
        }
        PriceOiDivergence::BullishDivergence => {
            "Price falling while open interest rises: positions accumulating into the dip"
        }
        PriceOiDivergence::BullishConfirmation => {
            "Price and open interest rising together: new capital supports the rally"
        }
        PriceOiDivergence::None if trend.is_rising() => {
            "Open interest rising: fresh capital entering the market"
        }
        PriceOiDivergence::None if trend.is_falling() => {
            "Open interest falling: positions being closed"
        }
        PriceOiDivergence::None => "Open interest stable: no significant capital flow",
    }
}

/// Analyze open interest for a symbol.
///
/// `history` is the hourly OI series and `candles` the matching hourly price
/// series. Returns `None` when fewer than [`MIN_OI_SAMPLES`] OI samples exist.
pub fn analyze(
    snapshot: &OpenInterestSnapshot,
    history: &[OpenInterestPoint],
    candles: &[Candle],
) -> Option<OiAssessment> {
    if history.len() < MIN_OI_SAMPLES {
        return None;
    }

    let oi: Vec<f64> = history.iter().map(|p| p.open_interest).collect();
    let change_24h_pct = change_pct(&oi, LOOKBACK_24H);
    let oi_slope = regression_slope(&oi[oi.len().saturating_sub(SLOPE_WINDOW)..]);
    let trend = classify_trend(oi_slope, change_24h_pct);

    let price_change_24h_pct = if candles.len() < LOOKBACK_24H {
        0.0
    } else {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        change_pct(&closes, LOOKBACK_24H)
    };
    let divergence = classify_divergence(price_change_24h_pct, change_24h_pct);

    Some(OiAssessment {
        current_oi: snapshot.open_interest,
        change_24h_pct,
        price_change_24h_pct,
        price_move: PriceMove::from_change_pct(price_change_24h_pct),
        oi_slope,
        trend,
        divergence,
        interpretation: interpret(trend, divergence).to_string(),
    })
}
