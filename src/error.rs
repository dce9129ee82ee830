use thiserror::Error;

/// Application error types.
///
/// Only market data access fails with an error. Analysis stages report
/// missing inputs as absent results instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
