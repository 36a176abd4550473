use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Percentage rate as entered by callers (`8` means 8%)
pub type Rate = Decimal;

/// Monetary amount in the snapshot's reporting currency
pub type Money = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Exchange ticker symbol, always upper-case once normalized
pub type Ticker = String;

/// Longest ticker accepted anywhere in the system
pub const MAX_TICKER_LEN: usize = 10;

/// Trim and upper-case a raw ticker, returning `None` unless the result is
/// 1 to 10 ASCII alphanumerics.
pub fn normalize_ticker(raw: &str) -> Option<Ticker> {
    let ticker = raw.trim().to_ascii_uppercase();
    if ticker.is_empty()
        || ticker.len() > MAX_TICKER_LEN
        || !ticker.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ticker)
}

pub fn is_valid_ticker(raw: &str) -> bool {
    normalize_ticker(raw).is_some()
}
