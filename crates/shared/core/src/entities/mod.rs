mod financials;
mod input;
mod output;

pub use financials::{DataField, FinancialDataSnapshot, SnapshotIssue};
pub use input::{DEFAULT_PROJECTION_YEARS, DcfInput, DcfRequest};
pub use output::{DcfOutput, ValuationStatus};
