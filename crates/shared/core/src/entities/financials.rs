use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::values::{Money, Ticker, is_valid_ticker};

/// Named figure of a financial data snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataField {
    Ticker,
    FiscalYears,
    Revenue,
    OperatingExpense,
    OperatingIncome,
    OperatingCashFlow,
    NetProfit,
    CapitalExpenditure,
    FreeCashFlow,
    Eps,
    TotalDebt,
    SharesOutstanding,
    CurrentPrice,
}

impl DataField {
    pub fn name(&self) -> &'static str {
        match self {
            DataField::Ticker => "ticker",
            DataField::FiscalYears => "fiscal_years",
            DataField::Revenue => "revenue",
            DataField::OperatingExpense => "operating_expense",
            DataField::OperatingIncome => "operating_income",
            DataField::OperatingCashFlow => "operating_cash_flow",
            DataField::NetProfit => "net_profit",
            DataField::CapitalExpenditure => "capital_expenditure",
            DataField::FreeCashFlow => "free_cash_flow",
            DataField::Eps => "eps",
            DataField::TotalDebt => "total_debt",
            DataField::SharesOutstanding => "shares_outstanding",
            DataField::CurrentPrice => "current_price",
        }
    }
}

impl fmt::Display for DataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structural problem found in a snapshot before it is used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotIssue {
    InvalidTicker(String),
    Empty(DataField),
    LengthMismatch {
        field: DataField,
        expected: usize,
        actual: usize,
    },
    UnorderedFiscalYears,
}

impl SnapshotIssue {
    /// Field the issue is attributed to
    pub fn field(&self) -> DataField {
        match self {
            SnapshotIssue::InvalidTicker(_) => DataField::Ticker,
            SnapshotIssue::Empty(field) => *field,
            SnapshotIssue::LengthMismatch { field, .. } => *field,
            SnapshotIssue::UnorderedFiscalYears => DataField::FiscalYears,
        }
    }
}

impl fmt::Display for SnapshotIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotIssue::InvalidTicker(ticker) => write!(f, "invalid ticker '{}'", ticker),
            SnapshotIssue::Empty(field) => write!(f, "{} has no values", field),
            SnapshotIssue::LengthMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "{} has {} values but other sequences have {}",
                field, actual, expected
            ),
            SnapshotIssue::UnorderedFiscalYears => {
                f.write_str("fiscal years are not strictly ascending")
            }
        }
    }
}

/// Read-only per-fiscal-year figures for one company.
///
/// Every populated sequence is indexed by ascending fiscal year, so the last
/// element is the latest year. Empty sequences mean "not reported".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialDataSnapshot {
    pub ticker: Ticker,
    pub fiscal_years: Vec<i32>,
    pub revenue: Vec<Money>,
    pub operating_expense: Vec<Money>,
    pub operating_income: Vec<Money>,
    pub operating_cash_flow: Vec<Money>,
    pub net_profit: Vec<Money>,
    pub capital_expenditure: Vec<Money>,
    pub free_cash_flow: Vec<Money>,
    pub eps: Vec<Money>,
    pub total_debt: Vec<Money>,
    pub shares_outstanding: Vec<Decimal>,
    /// Latest market price per share
    pub current_price: Option<Money>,
    /// Day the provider fetched the figures
    pub fetched_on: Option<NaiveDate>,
}

impl FinancialDataSnapshot {
    pub fn new(ticker: impl Into<String>) -> Self {
        let ticker: String = ticker.into();
        Self {
            ticker: ticker.trim().to_ascii_uppercase(),
            ..Default::default()
        }
    }

    pub fn latest_free_cash_flow(&self) -> Option<Money> {
        self.free_cash_flow.last().copied()
    }

    pub fn latest_total_debt(&self) -> Option<Money> {
        self.total_debt.last().copied()
    }

    pub fn latest_shares_outstanding(&self) -> Option<Decimal> {
        self.shares_outstanding.last().copied()
    }

    pub fn latest_revenue(&self) -> Option<Money> {
        self.revenue.last().copied()
    }

    pub fn latest_eps(&self) -> Option<Money> {
        self.eps.last().copied()
    }

    /// Revenue, free cash flow and EPS must all be reported
    pub fn has_minimum_required_data(&self) -> bool {
        !self.revenue.is_empty() && !self.free_cash_flow.is_empty() && !self.eps.is_empty()
    }

    fn sequence_lengths(&self) -> [(DataField, usize); 11] {
        [
            (DataField::FiscalYears, self.fiscal_years.len()),
            (DataField::Revenue, self.revenue.len()),
            (DataField::OperatingExpense, self.operating_expense.len()),
            (DataField::OperatingIncome, self.operating_income.len()),
            (DataField::OperatingCashFlow, self.operating_cash_flow.len()),
            (DataField::NetProfit, self.net_profit.len()),
            (DataField::CapitalExpenditure, self.capital_expenditure.len()),
            (DataField::FreeCashFlow, self.free_cash_flow.len()),
            (DataField::Eps, self.eps.len()),
            (DataField::TotalDebt, self.total_debt.len()),
            (DataField::SharesOutstanding, self.shares_outstanding.len()),
        ]
    }

    /// All populated sequences share one length
    pub fn is_consistent(&self) -> bool {
        self.check_lengths().is_ok()
    }

    fn check_lengths(&self) -> Result<(), SnapshotIssue> {
        let mut expected: Option<usize> = None;
        for (field, len) in self.sequence_lengths() {
            if len == 0 {
                continue;
            }
            match expected {
                None => expected = Some(len),
                Some(expected) if expected != len => {
                    return Err(SnapshotIssue::LengthMismatch {
                        field,
                        expected,
                        actual: len,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Structural check run before the snapshot feeds a valuation:
    /// ticker format, minimum data, equal lengths, ascending years.
    pub fn check(&self) -> Result<(), SnapshotIssue> {
        if !is_valid_ticker(&self.ticker) {
            return Err(SnapshotIssue::InvalidTicker(self.ticker.clone()));
        }

        for (field, values) in [
            (DataField::Revenue, &self.revenue),
            (DataField::FreeCashFlow, &self.free_cash_flow),
            (DataField::Eps, &self.eps),
        ] {
            if values.is_empty() {
                return Err(SnapshotIssue::Empty(field));
            }
        }

        self.check_lengths()?;

        if self.fiscal_years.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(SnapshotIssue::UnorderedFiscalYears);
        }

        Ok(())
    }
}
