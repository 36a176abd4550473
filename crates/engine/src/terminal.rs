//! Terminal Value
//!
//! Gordon growth on the last projected cash flow, discounted back over the
//! whole horizon:
//!
//! ```text
//! TV          = cf[n] × (1 + tg/100) / ((d - tg)/100)
//! TV (today)  = TV / (1 + d/100)^n
//! ```

use intrinsic_core::{Money, Rate};

use crate::error::{ArithmeticKind, Error, Result, Stage};
use crate::policy::{self, QuantityClass};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalValue {
    /// Value at the end of the horizon
    pub value: Money,
    /// `value` discounted to today
    pub discounted: Money,
}

pub fn terminal_value(
    projected: &[Money],
    terminal_growth_rate: Rate,
    discount_rate: Rate,
) -> Result<TerminalValue> {
    let stage = Stage::TerminalValue;
    let last = projected.last().copied().ok_or(Error::Arithmetic {
        stage,
        kind: ArithmeticKind::EmptyProjection,
    })?;

    let spread = policy::sub(discount_rate, terminal_growth_rate, QuantityClass::Rate, stage)?;
    if spread <= rust_decimal::Decimal::ZERO {
        return Err(Error::Arithmetic {
            stage,
            kind: ArithmeticKind::NonConvergentTerminalValue {
                discount_rate,
                terminal_growth_rate,
            },
        });
    }
    let spread = policy::percent_to_fraction(spread, stage)?;

    let next_year = policy::mul(
        last,
        policy::growth_factor(terminal_growth_rate, stage)?,
        QuantityClass::Intermediate,
        stage,
    )?;
    let value = policy::divide(next_year, spread, QuantityClass::Intermediate, stage)?;

    let discount = policy::pow(
        policy::growth_factor(discount_rate, stage)?,
        projected.len() as u32,
        QuantityClass::Factor,
        stage,
    )?;
    let discounted = policy::divide(value, discount, QuantityClass::Intermediate, stage)?;

    Ok(TerminalValue { value, discounted })
}
