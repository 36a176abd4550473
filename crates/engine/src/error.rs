//! Valuation errors
//!
//! Four failure kinds cover the whole pipeline. Validation and missing-data
//! failures are raised before any arithmetic; arithmetic and overflow
//! failures carry the stage that produced them.

use intrinsic_core::{DataField, Rate};
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use crate::policy::QuantityClass;

/// Pipeline stage an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Validation,
    Projection,
    Discounting,
    TerminalValue,
    Aggregation,
    Classification,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Validation => "validation",
            Stage::Projection => "projection",
            Stage::Discounting => "discounting",
            Stage::TerminalValue => "terminal value",
            Stage::Aggregation => "aggregation",
            Stage::Classification => "classification",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Input field named by a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    Ticker,
    DiscountRate,
    GrowthRate,
    FinalGrowthRate,
    TerminalGrowthRate,
    ProjectionYears,
}

impl InputField {
    pub fn name(&self) -> &'static str {
        match self {
            InputField::Ticker => "ticker",
            InputField::DiscountRate => "discount_rate",
            InputField::GrowthRate => "growth_rate",
            InputField::FinalGrowthRate => "final_growth_rate",
            InputField::TerminalGrowthRate => "terminal_growth_rate",
            InputField::ProjectionYears => "projection_years",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The bound an input value violated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Missing,
    Malformed,
    BelowMinimum(Decimal),
    AboveMaximum(Decimal),
    TooManyIntegerDigits(u32),
    TooManyFractionalDigits(u32),
    NotBelow(InputField),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing => f.write_str("is required"),
            Violation::Malformed => f.write_str("must be 1-10 letters or digits"),
            Violation::BelowMinimum(min) => write!(f, "must be at least {}", min),
            Violation::AboveMaximum(max) => write!(f, "must be at most {}", max),
            Violation::TooManyIntegerDigits(max) => {
                write!(f, "allows at most {} integer digits", max)
            }
            Violation::TooManyFractionalDigits(max) => {
                write!(f, "allows at most {} fractional digits", max)
            }
            Violation::NotBelow(other) => write!(f, "must be less than {}", other),
        }
    }
}

/// First rule an input broke
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field}: {violation} (got {value})")]
pub struct ValidationError {
    pub field: InputField,
    pub violation: Violation,
    pub value: String,
}

impl ValidationError {
    pub fn new(field: InputField, violation: Violation, value: impl ToString) -> Self {
        Self {
            field,
            violation,
            value: value.to_string(),
        }
    }

    pub fn missing(field: InputField) -> Self {
        Self::new(field, Violation::Missing, "<missing>")
    }
}

/// Degenerate math met mid-pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArithmeticKind {
    DivisionByZero,
    /// Discount rate does not exceed terminal growth, so the Gordon series diverges
    NonConvergentTerminalValue {
        discount_rate: Rate,
        terminal_growth_rate: Rate,
    },
    EmptyProjection,
    /// Equity plus debt leaves nothing to weight a cost of capital by
    NonPositiveCapital {
        equity_value: Decimal,
        debt_value: Decimal,
    },
}

impl fmt::Display for ArithmeticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticKind::DivisionByZero => f.write_str("division by zero"),
            ArithmeticKind::NonConvergentTerminalValue {
                discount_rate,
                terminal_growth_rate,
            } => write!(
                f,
                "terminal growth {}% is not below discount rate {}%",
                terminal_growth_rate, discount_rate
            ),
            ArithmeticKind::EmptyProjection => f.write_str("no projected cash flows"),
            ArithmeticKind::NonPositiveCapital {
                equity_value,
                debt_value,
            } => write!(
                f,
                "total capital of equity {} and debt {} is not positive",
                equity_value, debt_value
            ),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Missing data for {ticker}: {field} {detail}")]
    MissingData {
        ticker: String,
        field: DataField,
        detail: String,
    },

    #[error("Arithmetic failure during {stage}: {kind}")]
    Arithmetic { stage: Stage, kind: ArithmeticKind },

    #[error("Overflow during {stage}: {operation} exceeds {class} precision")]
    Overflow {
        stage: Stage,
        operation: &'static str,
        class: QuantityClass,
    },
}

impl Error {
    pub fn missing(ticker: impl Into<String>, field: DataField, detail: impl Into<String>) -> Self {
        Error::MissingData {
            ticker: ticker.into(),
            field,
            detail: detail.into(),
        }
    }

    /// Taxonomy name used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "ValidationError",
            Error::MissingData { .. } => "MissingDataError",
            Error::Arithmetic { .. } => "ArithmeticError",
            Error::Overflow { .. } => "OverflowError",
        }
    }

    /// Stage of a mid-pipeline failure; `None` for failures raised before arithmetic
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Arithmetic { stage, .. } | Error::Overflow { stage, .. } => Some(*stage),
            Error::Validation(_) | Error::MissingData { .. } => None,
        }
    }

    /// Raised before any computation started
    pub fn is_fail_fast(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::MissingData { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
