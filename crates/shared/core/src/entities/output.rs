use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::values::{Money, Rate, Ticker, Timestamp};

/// How the fair value compares with the market price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValuationStatus {
    /// Fair value sits above the price by more than the band
    Undervalued,
    /// Fair value sits below the price by more than the band
    Overvalued,
    /// Fair value within the band around the price
    #[serde(rename = "Fair Value")]
    FairValue,
}

impl ValuationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ValuationStatus::Undervalued => "Undervalued",
            ValuationStatus::Overvalued => "Overvalued",
            ValuationStatus::FairValue => "Fair Value",
        }
    }
}

impl fmt::Display for ValuationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one DCF valuation.
///
/// Money fields are at display scale (two decimals); shares outstanding is a
/// whole number. Produced once per calculation and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfOutput {
    pub ticker: Ticker,

    /// Equity value divided by shares outstanding
    pub fair_value_per_share: Money,

    /// Market price the fair value was compared with
    pub current_price: Money,

    pub valuation: ValuationStatus,

    /// `(fair - price) / price * 100`, absent when the percentage is too
    /// large to represent (a near-zero price against a large fair value)
    pub upside_pct: Option<Rate>,

    /// `(fair - price) / fair * 100`, absent when fair value is not positive
    pub margin_of_safety_pct: Option<Rate>,

    /// Undiscounted Gordon growth value at the end of the horizon
    pub terminal_value: Money,

    pub discounted_terminal_value: Money,

    pub present_value_of_cash_flows: Money,

    pub enterprise_value: Money,

    pub equity_value: Money,

    pub shares_outstanding: Decimal,

    /// Id of the input that produced this output
    pub input_id: Uuid,

    pub requested_by: Option<String>,

    pub calculated_at: Timestamp,
}

impl DcfOutput {
    pub fn is_undervalued(&self) -> bool {
        self.valuation == ValuationStatus::Undervalued
    }

    pub fn is_overvalued(&self) -> bool {
        self.valuation == ValuationStatus::Overvalued
    }

    /// Fair value minus market price, per share
    pub fn absolute_upside(&self) -> Money {
        self.fair_value_per_share - self.current_price
    }

    /// Upside strictly above `threshold_pct`.
    ///
    /// An unrepresentable upside exceeds any threshold in the direction of
    /// the fair value.
    pub fn has_significant_upside(&self, threshold_pct: Rate) -> bool {
        match self.upside_pct {
            Some(pct) => pct > threshold_pct,
            None => self.fair_value_per_share > self.current_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn make_output(fair: Decimal, price: Decimal, status: ValuationStatus) -> DcfOutput {
        DcfOutput {
            ticker: "ACME".to_string(),
            fair_value_per_share: fair,
            current_price: price,
            valuation: status,
            upside_pct: Some((fair - price) / price * dec!(100)),
            margin_of_safety_pct: None,
            terminal_value: Decimal::ZERO,
            discounted_terminal_value: Decimal::ZERO,
            present_value_of_cash_flows: Decimal::ZERO,
            enterprise_value: Decimal::ZERO,
            equity_value: Decimal::ZERO,
            shares_outstanding: dec!(1000),
            input_id: Uuid::new_v4(),
            requested_by: None,
            calculated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_label_matches_serialized_form() {
        assert_eq!(ValuationStatus::FairValue.to_string(), "Fair Value");
        let json = serde_json::to_string(&ValuationStatus::FairValue).unwrap();
        assert_eq!(json, "\"Fair Value\"");
    }

    #[test]
    fn test_upside_helpers() {
        let output = make_output(dec!(120), dec!(100), ValuationStatus::Undervalued);
        assert!(output.is_undervalued());
        assert!(!output.is_overvalued());
        assert_eq!(output.absolute_upside(), dec!(20));
        assert!(output.has_significant_upside(dec!(15)));
        assert!(!output.has_significant_upside(dec!(20)));
    }

    #[test]
    fn test_unrepresentable_upside_follows_fair_value() {
        let mut output = make_output(dec!(2500000000000000), dec!(0.01), ValuationStatus::Undervalued);
        output.upside_pct = None;
        assert!(output.has_significant_upside(dec!(1000000)));

        let mut output = make_output(dec!(-2500000000000000), dec!(0.01), ValuationStatus::Overvalued);
        output.upside_pct = None;
        assert!(!output.has_significant_upside(dec!(0)));
    }
}
