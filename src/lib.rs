//! Trendwatch - multi-timeframe trend, open interest and risk analysis for
//! perpetual futures markets.

pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use services::AnalysisService;
pub use sources::MarketDataSource;
pub use types::*;
