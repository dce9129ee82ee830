//! Signal pipeline.
//!
//! Indicator computation, per-timeframe trend classification, open interest
//! analysis, multi-timeframe consensus, risk alerts, recommendations and
//! price level planning. Every stage is a pure function over its inputs;
//! only [`timeframes::aggregate`] touches a data source.

pub mod indicators;
pub mod levels;
pub mod open_interest;
pub mod recommendation;
pub mod risk;
pub mod timeframes;
pub mod trend;

pub use indicators::{Indicator, IndicatorFrame, IndicatorRow};
pub use levels::{plan_for_series, plan_levels};
pub use recommendation::{recommend, risk_score};
pub use timeframes::{aggregate, consensus};
pub use trend::{assess_trend, MIN_TREND_CANDLES};
