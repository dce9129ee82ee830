//! Risk alert engine.
//!
//! Each heuristic is a plain function over a shared [`RiskContext`]. Rules are
//! independent and evaluated in a fixed order; every rule that fires appends
//! one alert to its severity bucket.

use crate::types::{
    OiAssessment, PriceOiDivergence, RiskAlert, RiskAlertKind, RiskAlertSet, Severity, Timeframe,
    TimeframeResults, TrendAssessment, TrendDirection,
};

/// Neutral RSI used when no timeframe has a defined value.
const NEUTRAL_RSI: f64 = 50.0;

/// Aggregate readings shared by every rule.
pub struct RiskContext<'a> {
    pub results: &'a TimeframeResults,
    pub oi: Option<&'a OiAssessment>,
    pub avg_rsi: f64,
    pub bullish: usize,
    pub bearish: usize,
    /// Nearest present timeframe, 5m first.
    pub nearest: Option<(Timeframe, &'a TrendAssessment)>,
}

impl<'a> RiskContext<'a> {
    pub fn new(results: &'a TimeframeResults, oi: Option<&'a OiAssessment>) -> Self {
        let (bullish, bearish, _) = results.direction_counts();
        Self {
            results,
            oi,
            avg_rsi: average_rsi(results),
            bullish,
            bearish,
            nearest: results.nearest(),
        }
    }

    fn rsi_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.results.assessments().filter_map(|a| a.rsi_value)
    }

    /// Timeframes with RSI above `upper`, and below `lower`.
    fn rsi_beyond(&self, upper: f64, lower: f64) -> (usize, usize) {
        self.rsi_values().fold((0, 0), |(over, under), rsi| {
            if rsi > upper {
                (over + 1, under)
            } else if rsi < lower {
                (over, under + 1)
            } else {
                (over, under)
            }
        })
    }

    fn divergence(&self) -> PriceOiDivergence {
        self.oi
            .map(|oi| oi.divergence)
            .unwrap_or(PriceOiDivergence::None)
    }

    fn timeframes(&self) -> usize {
        self.results.len()
    }

    /// Majority direction by vote count.
    pub fn consensus(&self) -> TrendDirection {
        match self.bullish.cmp(&self.bearish) {
            std::cmp::Ordering::Greater => TrendDirection::Bullish,
            std::cmp::Ordering::Less => TrendDirection::Bearish,
            std::cmp::Ordering::Equal => TrendDirection::Neutral,
        }
    }
}

/// Mean of the defined RSI values, or 50 when none is defined.
pub fn average_rsi(results: &TimeframeResults) -> f64 {
    let (sum, count) = results
        .assessments()
        .filter_map(|a| a.rsi_value)
        .fold((0.0, 0usize), |(sum, count), rsi| (sum + rsi, count + 1));

    if count == 0 {
        NEUTRAL_RSI
    } else {
        sum / count as f64
    }
}

/// A single heuristic.
pub type RiskRule = fn(&RiskContext) -> Option<(Severity, RiskAlert)>;

/// Three or more timeframes beyond 85/15.
fn extreme_rsi_cluster(ctx: &RiskContext) -> Option<(Severity, RiskAlert)> {
    let (over, under) = ctx.rsi_beyond(85.0, 15.0);
    if over + under < 3 {
        return None;
    }
    let message = if over >= under {
        format!("Extreme overbought cluster: RSI above 85 on {} timeframes", over)
    } else {
        format!("Extreme oversold cluster: RSI below 15 on {} timeframes", under)
    };
    Some((
        Severity::Critical,
        RiskAlert::new(RiskAlertKind::ExtremeRsiCluster, message),
    ))
}

/// Exactly two timeframes beyond 80/20.
fn rsi_cluster(ctx: &RiskContext) -> Option<(Severity, RiskAlert)> {
    let (over, under) = ctx.rsi_beyond(80.0, 20.0);
    if over + under != 2 {
        return None;
    }
    let message = if over >= under {
        "Overbought on 2 timeframes (RSI above 80)"
    } else {
        "Oversold on 2 timeframes (RSI below 20)"
    };
    Some((
        Severity::High,
        RiskAlert::new(RiskAlertKind::RsiCluster, message),
    ))
}

fn cluster_fired(ctx: &RiskContext) -> bool {
    extreme_rsi_cluster(ctx).is_some() || rsi_cluster(ctx).is_some()
}

fn rsi_overbought_drift(ctx: &RiskContext) -> Option<(Severity, RiskAlert)> {
    if ctx.avg_rsi <= 75.0 || cluster_fired(ctx) {
        return None;
    }
    Some((
        Severity::Medium,
        RiskAlert::new(
            RiskAlertKind::RsiOverboughtDrift,
            format!("Average RSI {:.1} drifting into overbought territory", ctx.avg_rsi),
        ),
    ))
}

fn rsi_oversold_drift(ctx: &RiskContext) -> Option<(Severity, RiskAlert)> {
    if ctx.avg_rsi >= 25.0 || cluster_fired(ctx) {
        return None;
    }
    Some((
        Severity::Medium,
        RiskAlert::new(
            RiskAlertKind::RsiOversoldDrift,
            format!("Average RSI {:.1} drifting into oversold territory", ctx.avg_rsi),
        ),
    ))
}

fn oi_divergence(ctx: &RiskContext) -> Option<(Severity, RiskAlert)> {
    match ctx.divergence() {
        PriceOiDivergence::BearishDivergence => Some((
            Severity::High,
            RiskAlert::new(
                RiskAlertKind::OiBearishDivergence,
                "Price rising while open interest falls: rally lacks support",
            ),
        )),
        PriceOiDivergence::BullishDivergence => Some((
            Severity::Medium,
            RiskAlert::new(
                RiskAlertKind::OiBullishDivergence,
                "Open interest building into falling price: possible reversal",
            ),
        )),
        _ => None,
    }
}

fn oi_confirmation(ctx: &RiskContext) -> Option<(Severity, RiskAlert)> {
    match ctx.divergence() {
        PriceOiDivergence::BearishConfirmation => Some((
            Severity::High,
            RiskAlert::new(
                RiskAlertKind::OiBearishConfirmation,
                "Falling price and open interest confirm the downtrend",
            ),
        )),
        PriceOiDivergence::BullishConfirmation => Some((
            Severity::Low,
            RiskAlert::new(
                RiskAlertKind::OiBullishConfirmation,
                "Rising price and open interest confirm the uptrend",
            ),
        )),
        _ => None,
    }
}

/// ATR relative to price on the nearest timeframe.
fn volatility(ctx: &RiskContext) -> Option<(Severity, RiskAlert)> {
    let (tf, nearest) = ctx.nearest?;
    let atr = nearest.atr_value?;
    if nearest.current_price <= 0.0 {
        return None;
    }
    let atr_pct = atr / nearest.current_price * 100.0;

    if atr_pct > 5.0 {
        Some((
            Severity::High,
            RiskAlert::new(
                RiskAlertKind::HighVolatility,
                format!("High volatility on {}: ATR is {:.2}% of price", tf, atr_pct),
            ),
        ))
    } else if atr_pct > 3.0 {
        Some((
            Severity::Medium,
            RiskAlert::new(
                RiskAlertKind::ElevatedVolatility,
                format!("Elevated volatility on {}: ATR is {:.2}% of price", tf, atr_pct),
            ),
        ))
    } else {
        None
    }
}

/// ADX on the nearest timeframe. An undefined ADX raises nothing.
fn trend_strength(ctx: &RiskContext) -> Option<(Severity, RiskAlert)> {
    let (tf, nearest) = ctx.nearest?;
    let adx = nearest.adx_value?;

    if adx < 20.0 {
        Some((
            Severity::Medium,
            RiskAlert::new(
                RiskAlertKind::WeakTrend,
                format!("Weak trend on {} (ADX {:.1}): false breakouts likely", tf, adx),
            ),
        ))
    } else if adx > 60.0 {
        Some((
            Severity::High,
            RiskAlert::new(
                RiskAlertKind::OverextendedTrend,
                format!("Overextended trend on {} (ADX {:.1}): exhaustion risk", tf, adx),
            ),
        ))
    } else {
        None
    }
}

fn timeframe_alignment(ctx: &RiskContext) -> Option<(Severity, RiskAlert)> {
    let n = ctx.timeframes();
    if n < 3 || (ctx.bullish != n && ctx.bearish != n) {
        return None;
    }
    Some((
        Severity::Low,
        RiskAlert::new(
            RiskAlertKind::TimeframeAlignment,
            format!("All {} timeframes agree: crowded positioning", n),
        ),
    ))
}

fn timeframe_conflict(ctx: &RiskContext) -> Option<(Severity, RiskAlert)> {
    let n = ctx.timeframes();
    if n < 3 || ctx.bullish.abs_diff(ctx.bearish) > 1 {
        return None;
    }
    Some((
        Severity::High,
        RiskAlert::new(
            RiskAlertKind::TimeframeConflict,
            format!(
                "Timeframes in conflict: {} bullish vs {} bearish",
                ctx.bullish, ctx.bearish
            ),
        ),
    ))
}

fn bull_trap(ctx: &RiskContext) -> Option<(Severity, RiskAlert)> {
    if ctx.avg_rsi <= 80.0 || ctx.divergence() != PriceOiDivergence::BearishDivergence {
        return None;
    }
    Some((
        Severity::Critical,
        RiskAlert::new(
            RiskAlertKind::BullTrap,
            "Possible bull trap: overbought rally while open interest falls",
        ),
    ))
}

fn capitulation(ctx: &RiskContext) -> Option<(Severity, RiskAlert)> {
    if ctx.avg_rsi >= 20.0 || ctx.divergence() != PriceOiDivergence::BearishConfirmation {
        return None;
    }
    Some((
        Severity::Medium,
        RiskAlert::new(
            RiskAlertKind::Capitulation,
            "Possible capitulation: oversold selloff with positions closing",
        ),
    ))
}

/// All rules in evaluation order.
pub const RULES: &[RiskRule] = &[
    extreme_rsi_cluster,
    rsi_cluster,
    rsi_overbought_drift,
    rsi_oversold_drift,
    oi_divergence,
    oi_confirmation,
    volatility,
    trend_strength,
    timeframe_alignment,
    timeframe_conflict,
    bull_trap,
    capitulation,
];

/// Evaluate every rule. Returns `None` when `results` is empty.
pub fn evaluate(results: &TimeframeResults, oi: Option<&OiAssessment>) -> Option<RiskAlertSet> {
    if results.is_empty() {
        return None;
    }

    let ctx = RiskContext::new(results, oi);
    let mut alerts = RiskAlertSet::new(ctx.avg_rsi, results.len(), ctx.consensus());

    for (severity, alert) in RULES.iter().filter_map(|rule| rule(&ctx)) {
        alerts.push(severity, alert);
    }

    Some(alerts)
}
