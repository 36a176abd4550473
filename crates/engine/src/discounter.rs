//! Present Value
//!
//! Discounts a projected series back to today:
//!
//! ```text
//! pv[i] = cash_flow[i] / (1 + d/100)^i        i = 1..=n
//! PV    = Σ pv[i]
//! ```
//!
//! Each term is rounded to the intermediate scale; the sum keeps that
//! scale and is only rounded to money scale when an output is built.
//!
//! [`wacc`] derives a discount rate from a capital structure:
//!
//! ```text
//! V    = E + D
//! WACC = E/V × Re + D/V × Rd × (1 - T/100)
//! ```

use intrinsic_core::{Money, Rate};
use rust_decimal::Decimal;

use crate::error::{ArithmeticKind, Error, Result, Stage};
use crate::policy::{self, QuantityClass};

/// Discounted series and its sum
#[derive(Debug, Clone, PartialEq)]
pub struct PresentValue {
    /// Discounted value of each projected year, year one first
    pub per_year: Vec<Money>,
    /// Sum of `per_year` at intermediate scale
    pub total: Money,
}

pub fn present_value(cash_flows: &[Money], discount_rate: Rate) -> Result<PresentValue> {
    let factor = policy::growth_factor(discount_rate, Stage::Discounting)?;
    if factor.is_zero() {
        return Err(Error::Arithmetic {
            stage: Stage::Discounting,
            kind: ArithmeticKind::DivisionByZero,
        });
    }

    let mut per_year = Vec::with_capacity(cash_flows.len());
    let mut total = Decimal::ZERO;
    for (index, cash_flow) in cash_flows.iter().enumerate() {
        let year = index as u32 + 1;
        let discount = policy::pow(factor, year, QuantityClass::Factor, Stage::Discounting)?;
        let discounted = policy::divide(
            *cash_flow,
            discount,
            QuantityClass::Intermediate,
            Stage::Discounting,
        )?;
        total = policy::add(
            total,
            discounted,
            QuantityClass::Intermediate,
            Stage::Discounting,
        )?;
        per_year.push(discounted);
    }

    Ok(PresentValue { per_year, total })
}

/// Weighted average cost of capital in percent.
///
/// Costs and tax rate are percentages; equity and debt are market values.
pub fn wacc(
    cost_of_equity: Rate,
    cost_of_debt: Rate,
    equity_value: Money,
    debt_value: Money,
    tax_rate: Rate,
) -> Result<Rate> {
    let stage = Stage::Discounting;
    let total = policy::add(equity_value, debt_value, QuantityClass::Intermediate, stage)?;
    if total <= Decimal::ZERO {
        return Err(Error::Arithmetic {
            stage,
            kind: ArithmeticKind::NonPositiveCapital {
                equity_value,
                debt_value,
            },
        });
    }

    let equity_weight = policy::divide(equity_value, total, QuantityClass::Factor, stage)?;
    let debt_weight = policy::divide(debt_value, total, QuantityClass::Factor, stage)?;
    let tax = policy::percent_to_fraction(tax_rate, stage)?;
    let after_tax = policy::sub(Decimal::ONE, tax, QuantityClass::Factor, stage)?;

    let equity_part = policy::mul(
        equity_weight,
        cost_of_equity,
        QuantityClass::Intermediate,
        stage,
    )?;
    let debt_cost = policy::mul(cost_of_debt, after_tax, QuantityClass::Intermediate, stage)?;
    let debt_part = policy::mul(debt_weight, debt_cost, QuantityClass::Intermediate, stage)?;
    policy::add(equity_part, debt_part, QuantityClass::Rate, stage)
}
