//! Batch report
//!
//! Serializable view of a batch run. Decimals serialize as strings so the
//! report carries exact digits.

use intrinsic_core::{DcfOutput, Money, Rate, Ticker, Timestamp};
use intrinsic_engine::{SensitivityGrid, ValuationStats};
use serde::{Deserialize, Serialize};

use crate::service::{Appraisal, ServiceError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub name: String,
    pub generated_at: Timestamp,
    pub valuations: Vec<ValuationEntry>,
    pub sensitivities: Vec<SensitivityEntry>,
    /// Over the successful valuations only
    pub stats: ValuationStats,
}

impl BatchReport {
    pub fn failure_count(&self) -> usize {
        self.valuations
            .iter()
            .filter(|entry| entry.error.is_some())
            .count()
            + self
                .sensitivities
                .iter()
                .filter(|entry| entry.error.is_some())
                .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    pub message: String,
}

impl From<&ServiceError> for ErrorEntry {
    fn from(err: &ServiceError) -> Self {
        let stage = match err {
            ServiceError::Valuation(err) => err.stage().map(|stage| stage.name().to_string()),
            _ => None,
        };
        Self {
            kind: err.kind().to_string(),
            stage,
            message: err.to_string(),
        }
    }
}

impl From<&intrinsic_engine::Error> for ErrorEntry {
    fn from(err: &intrinsic_engine::Error) -> Self {
        Self {
            kind: err.kind().to_string(),
            stage: err.stage().map(|stage| stage.name().to_string()),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationEntry {
    /// Requested ticker, as given
    pub ticker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<DcfOutput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_revenue_growth_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEntry>,
}

impl ValuationEntry {
    pub fn new(ticker: Option<String>, result: &Result<Appraisal, ServiceError>) -> Self {
        match result {
            Ok(appraisal) => Self {
                ticker,
                output: Some(appraisal.output.clone()),
                advisories: appraisal
                    .advisories
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                average_revenue_growth_pct: appraisal.revenue_growth_pct,
                error: None,
            },
            Err(err) => Self {
                ticker,
                output: None,
                advisories: Vec::new(),
                average_revenue_growth_pct: None,
                error: Some(err.into()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellFailure {
    pub discount_rate: Rate,
    pub growth_rate: Rate,
    pub error: ErrorEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityEntry {
    pub ticker: Option<Ticker>,
    pub discount_rates: Vec<Rate>,
    pub growth_rates: Vec<Rate>,
    /// Row per discount rate; failed cells are null
    pub fair_values: Vec<Vec<Option<Money>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<CellFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_case: Option<DcfOutput>,
    /// Why the unswept request itself failed, if it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_case_error: Option<ErrorEntry>,
    /// Set when the sweep could not start at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEntry>,
}

impl SensitivityEntry {
    pub fn from_grid(grid: &SensitivityGrid) -> Self {
        let failures = grid
            .iter()
            .filter_map(|cell| {
                cell.outcome.as_ref().err().map(|err| CellFailure {
                    discount_rate: cell.discount_rate,
                    growth_rate: cell.growth_rate,
                    error: err.into(),
                })
            })
            .collect();

        Self {
            ticker: Some(grid.ticker.clone()),
            discount_rates: grid.discount_rates.clone(),
            growth_rates: grid.growth_rates.clone(),
            fair_values: grid.fair_values(),
            failures,
            base_case: grid.base_case.as_ref().ok().cloned(),
            base_case_error: grid.base_case.as_ref().err().map(ErrorEntry::from),
            error: None,
        }
    }

    pub fn failed(ticker: Option<String>, err: &ServiceError) -> Self {
        Self {
            ticker,
            discount_rates: Vec::new(),
            growth_rates: Vec::new(),
            fair_values: Vec::new(),
            failures: Vec::new(),
            base_case: None,
            base_case_error: None,
            error: Some(err.into()),
        }
    }
}
