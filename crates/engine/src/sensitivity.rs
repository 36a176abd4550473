//! Sensitivity Analysis
//!
//! Re-runs the full valuation over a grid of discount and growth rates.
//! Rows follow the discount axis, columns the growth axis:
//!
//! ```text
//!              g[0]       g[1]      ...
//!   d[0]   output|err  output|err
//!   d[1]   output|err  output|err
//! ```
//!
//! Each cell derives its input from the base input with only the two rates
//! replaced, and goes through [`DcfCalculator::calculate`]. A failing cell
//! records its error and the sweep moves on.

use intrinsic_core::{
    DcfInput, DcfOutput, FinancialDataSnapshot, Money, Rate, Ticker, normalize_ticker,
};
use log::{info, warn};
use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::calculator::DcfCalculator;
use crate::error::{Result, Stage};
use crate::policy::{self, QuantityClass};

/// One grid cell
#[derive(Debug, Clone)]
pub struct SensitivityCell {
    pub discount_rate: Rate,
    pub growth_rate: Rate,
    pub outcome: Result<DcfOutput>,
}

impl SensitivityCell {
    pub fn fair_value(&self) -> Option<Money> {
        self.outcome
            .as_ref()
            .ok()
            .map(|output| output.fair_value_per_share)
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Debug, Clone)]
pub struct SensitivityGrid {
    pub ticker: Ticker,
    pub discount_rates: Vec<Rate>,
    pub growth_rates: Vec<Rate>,
    /// Valuation of the unmodified input
    pub base_case: Result<DcfOutput>,
    /// `cells[row][column]`, row per discount rate
    pub cells: Vec<Vec<SensitivityCell>>,
}

impl SensitivityGrid {
    pub fn cell(&self, row: usize, column: usize) -> Option<&SensitivityCell> {
        self.cells.get(row).and_then(|cells| cells.get(column))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensitivityCell> {
        self.cells.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn failure_count(&self) -> usize {
        self.iter().filter(|cell| !cell.is_ok()).count()
    }

    /// Fair value matrix; failed cells are `None`
    pub fn fair_values(&self) -> Vec<Vec<Option<Money>>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(SensitivityCell::fair_value).collect())
            .collect()
    }
}

pub struct SensitivityAxes;

impl SensitivityAxes {
    /// `count` evenly spaced rates around `center`.
    ///
    /// The axis starts `count / 2` steps below the center, so an even count
    /// has one more point above it: `centered(8, 1, 6)` is `5..=10`.
    pub fn centered(center: Rate, step: Rate, count: usize) -> Result<Vec<Rate>> {
        let stage = Stage::Validation;
        let offset = policy::mul(
            step,
            Decimal::from(count / 2),
            QuantityClass::Rate,
            stage,
        )?;
        let start = policy::sub(center, offset, QuantityClass::Rate, stage)?;

        (0..count)
            .map(|index| {
                let shift = policy::mul(step, Decimal::from(index), QuantityClass::Rate, stage)?;
                policy::add(start, shift, QuantityClass::Rate, stage)
            })
            .collect()
    }
}

pub struct SensitivityEngine<'a> {
    calculator: &'a DcfCalculator,
}

impl<'a> SensitivityEngine<'a> {
    pub fn new(calculator: &'a DcfCalculator) -> Self {
        Self { calculator }
    }

    pub fn sweep(
        &self,
        input: &DcfInput,
        data: &FinancialDataSnapshot,
        discount_rates: &[Rate],
        growth_rates: &[Rate],
    ) -> SensitivityGrid {
        info!(
            "Sensitivity sweep for {}: {} x {} cells",
            input.ticker,
            discount_rates.len(),
            growth_rates.len()
        );
        let cells: Vec<Vec<SensitivityCell>> = discount_rates
            .iter()
            .map(|discount_rate| {
                growth_rates
                    .iter()
                    .map(|growth_rate| self.cell(input, data, *discount_rate, *growth_rate))
                    .collect::<Vec<_>>()
            })
            .collect();
        self.finish(input, data, discount_rates, growth_rates, cells)
    }

    /// Same grid as [`sweep`](Self::sweep), one rayon task per cell
    pub fn sweep_parallel(
        &self,
        input: &DcfInput,
        data: &FinancialDataSnapshot,
        discount_rates: &[Rate],
        growth_rates: &[Rate],
    ) -> SensitivityGrid {
        info!(
            "Parallel sensitivity sweep for {}: {} x {} cells",
            input.ticker,
            discount_rates.len(),
            growth_rates.len()
        );
        let cells: Vec<Vec<SensitivityCell>> = discount_rates
            .par_iter()
            .map(|discount_rate| {
                growth_rates
                    .par_iter()
                    .map(|growth_rate| self.cell(input, data, *discount_rate, *growth_rate))
                    .collect::<Vec<_>>()
            })
            .collect();
        self.finish(input, data, discount_rates, growth_rates, cells)
    }

    fn cell(
        &self,
        input: &DcfInput,
        data: &FinancialDataSnapshot,
        discount_rate: Rate,
        growth_rate: Rate,
    ) -> SensitivityCell {
        let outcome = self
            .calculator
            .calculate(&input.with_rates(discount_rate, growth_rate), data);
        if let Err(err) = &outcome {
            warn!(
                "{} cell d={}% g={}% failed: {}",
                input.ticker, discount_rate, growth_rate, err
            );
        }
        SensitivityCell {
            discount_rate,
            growth_rate,
            outcome,
        }
    }

    fn finish(
        &self,
        input: &DcfInput,
        data: &FinancialDataSnapshot,
        discount_rates: &[Rate],
        growth_rates: &[Rate],
        cells: Vec<Vec<SensitivityCell>>,
    ) -> SensitivityGrid {
        let grid = SensitivityGrid {
            ticker: normalize_ticker(&input.ticker).unwrap_or_else(|| input.ticker.clone()),
            discount_rates: discount_rates.to_vec(),
            growth_rates: growth_rates.to_vec(),
            base_case: self.calculator.calculate(input, data),
            cells,
        };
        info!(
            "Sensitivity sweep for {} done: {} cells, {} failed",
            grid.ticker,
            grid.len(),
            grid.failure_count()
        );
        grid
    }
}
