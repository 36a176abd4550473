use thiserror::Error;

/// Failures reported by a financial data provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("No financial data for ticker {0}")]
    UnknownTicker(String),

    #[error("Invalid ticker symbol: {0}")]
    InvalidTicker(String),

    #[error("Financial data source unavailable: {0}")]
    Unavailable(String),
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
