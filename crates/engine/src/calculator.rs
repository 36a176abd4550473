//! DCF Calculator
//!
//! Runs one valuation end to end. Validation and snapshot checks complete
//! before any arithmetic starts; the first failing stage aborts the
//! calculation with a typed error.

use intrinsic_core::{
    DataField, DcfInput, DcfOutput, FinancialDataSnapshot, Rate, SnapshotIssue, Ticker,
    normalize_ticker,
};
use intrinsic_ports::Clock;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::advisory::{self, Advisory};
use crate::aggregator::{LatestFigures, ValuationAggregator};
use crate::config::EngineConfig;
use crate::discounter;
use crate::error::{Error, InputField, Result, Stage, ValidationError, Violation};
use crate::policy::{self, QuantityClass};
use crate::projector;
use crate::sensitivity::{SensitivityEngine, SensitivityGrid};
use crate::terminal;
use crate::validator::Validator;

pub struct DcfCalculator {
    config: EngineConfig,
    aggregator: ValuationAggregator,
    clock: Arc<dyn Clock>,
}

impl DcfCalculator {
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let aggregator = ValuationAggregator::new(config.fair_value_band_pct);
        Self {
            config,
            aggregator,
            clock,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Value one company under one set of assumptions
    pub fn calculate(&self, input: &DcfInput, data: &FinancialDataSnapshot) -> Result<DcfOutput> {
        Validator::validate(input)?;
        let ticker = canonical_ticker(input)?;
        let figures = self.check_snapshot(&ticker, data)?;
        let base_fcf = latest_positive_fcf(data)?;

        debug!(
            "Valuing {} d={}% g={}% (final {:?}) tg={}% over {} years from FCF {}",
            ticker,
            input.discount_rate,
            input.growth_rate,
            input.final_growth_rate,
            input.terminal_growth_rate,
            input.projection_years,
            base_fcf
        );

        let projected = match input.final_growth_rate {
            Some(final_rate) => projector::project_declining(
                base_fcf,
                input.growth_rate,
                final_rate,
                input.projection_years,
            )?,
            None => projector::project(base_fcf, input.growth_rate, input.projection_years)?,
        };
        debug!("{} projected cash flows: {:?}", ticker, projected);

        let present_value = discounter::present_value(&projected, input.discount_rate)?;
        debug!("{} present value {}", ticker, present_value.total);

        let terminal = terminal::terminal_value(
            &projected,
            input.terminal_growth_rate,
            input.discount_rate,
        )?;
        debug!(
            "{} terminal value {} discounted {}",
            ticker, terminal.value, terminal.discounted
        );

        let valuation = self
            .aggregator
            .aggregate(present_value.total, terminal.discounted, &figures)?;

        let money = |value: Decimal| policy::quantize(value, QuantityClass::Money, Stage::Aggregation);
        let output = DcfOutput {
            ticker,
            fair_value_per_share: money(valuation.fair_value_per_share)?,
            current_price: money(figures.price())?,
            valuation: valuation.status,
            upside_pct: valuation.upside_pct,
            margin_of_safety_pct: valuation.margin_of_safety_pct,
            terminal_value: money(terminal.value)?,
            discounted_terminal_value: money(terminal.discounted)?,
            present_value_of_cash_flows: money(present_value.total)?,
            enterprise_value: money(valuation.enterprise_value)?,
            equity_value: money(valuation.equity_value)?,
            shares_outstanding: figures.shares(),
            input_id: input.id,
            requested_by: input.requested_by.clone(),
            calculated_at: self.clock.now(),
        };

        info!(
            "{} fair value {} vs price {} ({:?}%): {}",
            output.ticker,
            output.fair_value_per_share,
            output.current_price,
            output.upside_pct,
            output.valuation
        );
        Ok(output)
    }

    /// Re-run the valuation over every discount/growth pair.
    ///
    /// Failing cells keep their error; the sweep always completes.
    pub fn calculate_sensitivity(
        &self,
        input: &DcfInput,
        data: &FinancialDataSnapshot,
        discount_rates: &[Rate],
        growth_rates: &[Rate],
    ) -> SensitivityGrid {
        let engine = SensitivityEngine::new(self);
        if self.config.parallel_sensitivity {
            engine.sweep_parallel(input, data, discount_rates, growth_rates)
        } else {
            engine.sweep(input, data, discount_rates, growth_rates)
        }
    }

    /// Advisories for the assumptions of `input` and, when given, its result
    pub fn advise(&self, input: &DcfInput, output: Option<&DcfOutput>) -> Vec<Advisory> {
        let mut advisories = advisory::input_advisories(input, &self.config.advisories);
        if let Some(output) = output {
            advisories.extend(advisory::output_advisories(output, &self.config.advisories));
        }
        for advisory in &advisories {
            warn!("{}: {}", input.ticker, advisory);
        }
        advisories
    }

    fn check_snapshot(&self, ticker: &str, data: &FinancialDataSnapshot) -> Result<LatestFigures> {
        data.check()
            .map_err(|issue| Error::missing(ticker, issue.field(), issue_detail(&issue)))?;

        if normalize_ticker(&data.ticker).as_deref() != Some(ticker) {
            return Err(Error::missing(
                ticker,
                DataField::Ticker,
                format!("snapshot belongs to {}", data.ticker),
            ));
        }

        LatestFigures::from_snapshot(data)
    }
}

/// Upper-cased ticker of an input that has passed validation
fn canonical_ticker(input: &DcfInput) -> Result<Ticker> {
    normalize_ticker(&input.ticker).ok_or_else(|| {
        ValidationError::new(InputField::Ticker, Violation::Malformed, &input.ticker).into()
    })
}

fn latest_positive_fcf(data: &FinancialDataSnapshot) -> Result<Decimal> {
    match data.latest_free_cash_flow() {
        Some(fcf) if fcf > Decimal::ZERO => Ok(fcf),
        Some(fcf) => Err(Error::missing(
            &data.ticker,
            DataField::FreeCashFlow,
            format!("latest value must be positive, got {}", fcf),
        )),
        None => Err(Error::missing(&data.ticker, DataField::FreeCashFlow, "is absent")),
    }
}

fn issue_detail(issue: &SnapshotIssue) -> String {
    match issue {
        SnapshotIssue::InvalidTicker(ticker) => format!("'{}' is not a valid ticker", ticker),
        SnapshotIssue::Empty(_) => "has no values".to_string(),
        SnapshotIssue::LengthMismatch {
            expected, actual, ..
        } => format!("has {} values, expected {}", actual, expected),
        SnapshotIssue::UnorderedFiscalYears => "are not strictly ascending".to_string(),
    }
}
