//! Advisories
//!
//! Non-fatal warnings about assumptions and results that look unusual for a
//! listed company. They never stop a calculation; callers decide whether to
//! surface them.

use intrinsic_core::{DcfInput, DcfOutput, Money, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InputField;

/// Typical ranges, in percent, and result thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub min_growth_rate: Rate,
    pub max_growth_rate: Rate,
    pub min_discount_rate: Rate,
    pub max_discount_rate: Rate,
    pub min_terminal_growth_rate: Rate,
    pub max_terminal_growth_rate: Rate,
    /// Fair value per share above this is flagged
    pub max_fair_value: Money,
    /// Fair value over price above this ratio is flagged
    pub max_price_ratio: Decimal,
    /// Fair value over price below this ratio is flagged
    pub min_price_ratio: Decimal,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            min_growth_rate: dec!(-50),
            max_growth_rate: dec!(50),
            min_discount_rate: dec!(5),
            max_discount_rate: dec!(20),
            min_terminal_growth_rate: dec!(2),
            max_terminal_growth_rate: dec!(4),
            max_fair_value: dec!(10000),
            max_price_ratio: dec!(10),
            min_price_ratio: dec!(0.1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    /// A rate outside its typical range
    UnusualRate {
        field: InputField,
        value: Rate,
        min: Rate,
        max: Rate,
    },
    HighFairValue { fair_value: Money, threshold: Money },
    FarAbovePrice { fair_value: Money, price: Money },
    FarBelowPrice { fair_value: Money, price: Money },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::UnusualRate {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "{} of {}% is outside the typical range {}% to {}%",
                field, value, min, max
            ),
            Advisory::HighFairValue {
                fair_value,
                threshold,
            } => write!(
                f,
                "fair value {} per share exceeds {}",
                fair_value, threshold
            ),
            Advisory::FarAbovePrice { fair_value, price } => write!(
                f,
                "fair value {} is more than ten times the price {}",
                fair_value, price
            ),
            Advisory::FarBelowPrice { fair_value, price } => write!(
                f,
                "fair value {} is less than a tenth of the price {}",
                fair_value, price
            ),
        }
    }
}

fn check_range(field: InputField, value: Rate, min: Rate, max: Rate) -> Option<Advisory> {
    (value < min || value > max).then_some(Advisory::UnusualRate {
        field,
        value,
        min,
        max,
    })
}

/// Assumptions outside the usual ranges
pub fn input_advisories(input: &DcfInput, config: &AdvisoryConfig) -> Vec<Advisory> {
    [
        check_range(
            InputField::GrowthRate,
            input.growth_rate,
            config.min_growth_rate,
            config.max_growth_rate,
        ),
        check_range(
            InputField::DiscountRate,
            input.discount_rate,
            config.min_discount_rate,
            config.max_discount_rate,
        ),
        check_range(
            InputField::TerminalGrowthRate,
            input.terminal_growth_rate,
            config.min_terminal_growth_rate,
            config.max_terminal_growth_rate,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Results that look out of proportion with the market price
pub fn output_advisories(output: &DcfOutput, config: &AdvisoryConfig) -> Vec<Advisory> {
    let fair_value = output.fair_value_per_share;
    let price = output.current_price;
    let mut advisories = Vec::new();

    if fair_value > config.max_fair_value {
        advisories.push(Advisory::HighFairValue {
            fair_value,
            threshold: config.max_fair_value,
        });
    }

    if price > Decimal::ZERO {
        // Compare fair against price × ratio; an overflowing product cannot be exceeded
        if price
            .checked_mul(config.max_price_ratio)
            .is_some_and(|limit| fair_value > limit)
        {
            advisories.push(Advisory::FarAbovePrice { fair_value, price });
        }
        if price
            .checked_mul(config.min_price_ratio)
            .is_some_and(|limit| fair_value < limit)
        {
            advisories.push(Advisory::FarBelowPrice { fair_value, price });
        }
    }

    advisories
}
