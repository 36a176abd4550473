//! Valuation Statistics
//!
//! Summary counts over a set of outputs, e.g. one batch run.

use intrinsic_core::{DcfOutput, Rate, ValuationStatus};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{Result, Stage};
use crate::policy::{self, QuantityClass};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationStats {
    pub total: usize,
    pub undervalued: usize,
    pub overvalued: usize,
    pub fair_value: usize,
    /// Share of undervalued outputs in percent, two decimals
    pub undervalued_pct: Rate,
    pub overvalued_pct: Rate,
}

impl ValuationStats {
    pub fn from_outputs<'a>(outputs: impl IntoIterator<Item = &'a DcfOutput>) -> Result<Self> {
        let mut stats = Self::default();
        for output in outputs {
            stats.total += 1;
            match output.valuation {
                ValuationStatus::Undervalued => stats.undervalued += 1,
                ValuationStatus::Overvalued => stats.overvalued += 1,
                ValuationStatus::FairValue => stats.fair_value += 1,
            }
        }
        stats.undervalued_pct = share_pct(stats.undervalued, stats.total)?;
        stats.overvalued_pct = share_pct(stats.overvalued, stats.total)?;
        Ok(stats)
    }
}

/// `count / total` rounded to four places, times 100
fn share_pct(count: usize, total: usize) -> Result<Rate> {
    if total == 0 {
        return Ok(Decimal::ZERO);
    }
    let fraction = policy::divide(
        Decimal::from(count),
        Decimal::from(total),
        QuantityClass::Rate,
        Stage::Classification,
    )?
    .round_dp_with_strategy(4, policy::ROUNDING);
    policy::mul(fraction, dec!(100), QuantityClass::Rate, Stage::Classification)
}
