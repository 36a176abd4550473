//! Intrinsic Runner - Batch Valuation
//!
//! Drives the valuation engine from a JSON run description:
//!
//! - **Config**: companies, valuation requests and sensitivity sweeps
//! - **Provider**: in-memory financial data behind the provider port
//! - **Service**: async validation, fetch and blocking-pool calculation
//! - **Report**: JSON-serializable results, errors and statistics
//!
//! ## Architecture
//!
//! ```text
//!   config.json
//!        │
//!        ▼
//! ┌──────────────┐   snapshots   ┌──────────────────────────────┐
//! │ RunnerConfig │──────────────►│ InMemoryFinancialDataProvider│
//! └──────┬───────┘               └──────────────┬───────────────┘
//!        │ requests                             │ snapshot(ticker)
//!        ▼                                      ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     ValuationService                         │
//! │   validate ──► fetch ──► spawn_blocking(DcfCalculator)       │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ outputs, grids, errors
//!                                ▼
//!                          BatchReport (JSON)
//! ```

pub mod batch;
pub mod config;
pub mod provider;
pub mod report;
pub mod service;

// Re-export main types
pub use batch::BatchRunner;
pub use config::{AxisConfig, ConfigError, MAX_AXIS_POINTS, RunnerConfig, SensitivityConfig};
pub use provider::InMemoryFinancialDataProvider;
pub use report::{BatchReport, CellFailure, ErrorEntry, SensitivityEntry, ValuationEntry};
pub use service::{Appraisal, ServiceError, ServiceResult, ValuationService};
