//! Intrinsic Ports
//!
//! Port definitions (traits) for the valuation workspace.
//! These define the boundaries between the pure valuation core and the
//! collaborators it depends on: wall-clock time and financial data.

mod clock;
mod error;
mod provider;

pub use clock::Clock;
pub use error::{ProviderError, ProviderResult};
pub use provider::FinancialDataProvider;
