//! Cash Flow Projection
//!
//! Compounds the latest free cash flow forward over the horizon:
//!
//! ```text
//! projected[i] = projected[i-1] × (1 + g/100)      projected[0] = base
//! ```
//!
//! Each year is one multiplication at intermediate scale, never a logarithm
//! or a standalone power of the growth factor, so the reachable horizon is
//! bounded by the size of the cash flows themselves. A cash flow that needs
//! more than 18 integer digits is an `OverflowError` at the projection stage.

use intrinsic_core::{Money, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{Result, Stage};
use crate::policy::{self, QuantityClass};
use crate::validator::MAX_PROJECTION_YEARS;

fn horizon(years: u32) -> Vec<Money> {
    Vec::with_capacity(years.min(MAX_PROJECTION_YEARS) as usize)
}

/// Project `years` cash flows growing at a constant `growth_rate` percent
pub fn project(base_fcf: Money, growth_rate: Rate, years: u32) -> Result<Vec<Money>> {
    let factor = policy::growth_factor(growth_rate, Stage::Projection)?;

    let mut flows = horizon(years);
    let mut current = base_fcf;
    for _ in 0..years {
        current = policy::mul(current, factor, QuantityClass::Intermediate, Stage::Projection)?;
        flows.push(current);
    }
    Ok(flows)
}

/// Project with growth fading linearly from `initial_rate` in year one to
/// `final_rate` in the last year, compounding year over year.
///
/// A one-year horizon grows at `initial_rate`.
pub fn project_declining(
    base_fcf: Money,
    initial_rate: Rate,
    final_rate: Rate,
    years: u32,
) -> Result<Vec<Money>> {
    if years == 0 {
        return Ok(Vec::new());
    }

    let step = if years == 1 {
        Decimal::ZERO
    } else {
        let spread = policy::sub(
            initial_rate,
            final_rate,
            QuantityClass::Rate,
            Stage::Projection,
        )?;
        policy::divide(
            spread,
            Decimal::from(years - 1),
            QuantityClass::Rate,
            Stage::Projection,
        )?
    };

    let mut flows = horizon(years);
    let mut current = base_fcf;
    for year in 1..=years {
        let decline = policy::mul(
            step,
            Decimal::from(year - 1),
            QuantityClass::Rate,
            Stage::Projection,
        )?;
        let rate = policy::sub(initial_rate, decline, QuantityClass::Rate, Stage::Projection)?;
        let factor = policy::growth_factor(rate, Stage::Projection)?;
        current = policy::mul(current, factor, QuantityClass::Intermediate, Stage::Projection)?;
        flows.push(current);
    }
    Ok(flows)
}

/// Mean year-over-year revenue growth in percent.
///
/// Years whose previous revenue is zero are skipped; `None` when fewer than
/// two usable years remain.
pub fn historical_growth_rate(revenue: &[Money]) -> Result<Option<Rate>> {
    let mut total = Decimal::ZERO;
    let mut count: u32 = 0;

    for pair in revenue.windows(2) {
        let (previous, current) = (pair[0], pair[1]);
        if previous.is_zero() {
            continue;
        }
        let change = policy::sub(
            current,
            previous,
            QuantityClass::Intermediate,
            Stage::Projection,
        )?;
        let scaled = policy::mul(
            change,
            dec!(100),
            QuantityClass::Intermediate,
            Stage::Projection,
        )?;
        let growth = policy::divide(scaled, previous, QuantityClass::Rate, Stage::Projection)?;
        total = policy::add(total, growth, QuantityClass::Rate, Stage::Projection)?;
        count += 1;
    }

    if count == 0 {
        return Ok(None);
    }
    policy::divide(
        total,
        Decimal::from(count),
        QuantityClass::Rate,
        Stage::Projection,
    )
    .map(Some)
}
