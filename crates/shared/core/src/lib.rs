//! Intrinsic Core Domain
//!
//! Value objects shared by every crate of the valuation workspace.
//! This crate contains no async, no I/O, no arithmetic policy, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    // Valuation request
    DEFAULT_PROJECTION_YEARS,
    DcfInput,
    DcfRequest,
    // Financial data consumed from providers
    DataField,
    FinancialDataSnapshot,
    SnapshotIssue,
    // Valuation result
    DcfOutput,
    ValuationStatus,
};
pub use values::{Money, Rate, Ticker, Timestamp, is_valid_ticker, normalize_ticker};
