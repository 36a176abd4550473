//! Intrinsic Engine
//!
//! Exact-decimal discounted cash flow valuation:
//! - **Validation**: ranges, digit limits and cross-field rules on the assumptions
//! - **Projection**: compounds the latest free cash flow over the horizon
//! - **Discounting**: present value of every projected year
//! - **Terminal Value**: Gordon growth beyond the horizon
//! - **Aggregation**: enterprise and equity value, fair value per share, classification
//! - **Sensitivity**: the same pipeline over a discount/growth grid
//!
//! ## Pipeline
//!
//! ```text
//! DcfInput ─────┐
//!               ▼
//! ┌──────────────────────────────────────────┐
//! │  Validator        ranges, digits, tg < d │──► ValidationError
//! └────────────────────┬─────────────────────┘
//! Snapshot ───────────►│ latest FCF, debt, shares, price
//!                      │                        ──► MissingDataError
//! ┌────────────────────▼─────────────────────┐
//! │  Projector        base × (1 + g)^i       │
//! └────────────────────┬─────────────────────┘
//! ┌────────────────────▼─────────────────────┐
//! │  Discounter       Σ cf[i] / (1 + d)^i    │
//! └────────────────────┬─────────────────────┘
//! ┌────────────────────▼─────────────────────┐
//! │  Terminal value   cf[n](1 + tg)/(d - tg) │──► ArithmeticError
//! └────────────────────┬─────────────────────┘
//! ┌────────────────────▼─────────────────────┐
//! │  Aggregator       EV, equity, fair/share │
//! │                   ±band classification   │
//! └────────────────────┬─────────────────────┘
//!                      ▼
//!                  DcfOutput
//! ```
//!
//! Every operation rounds through the [`policy`] table. There is no
//! floating-point path.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use intrinsic_engine::{DcfCalculator, EngineConfig};
//!
//! let calculator = DcfCalculator::new(EngineConfig::default(), Arc::new(SystemClock));
//! let input = DcfInput::new("ACME", dec!(8), dec!(10), dec!(2.5));
//!
//! let output = calculator.calculate(&input, &snapshot)?;
//! let grid = calculator.calculate_sensitivity(&input, &snapshot, &discounts, &growths);
//! ```

pub mod advisory;
pub mod aggregator;
pub mod calculator;
pub mod config;
pub mod discounter;
pub mod error;
pub mod policy;
pub mod projector;
pub mod sensitivity;
pub mod stats;
pub mod terminal;
pub mod validator;

// Re-export main types
pub use advisory::{Advisory, AdvisoryConfig};
pub use aggregator::{LatestFigures, Valuation, ValuationAggregator};
pub use calculator::DcfCalculator;
pub use config::EngineConfig;
pub use discounter::PresentValue;
pub use error::{
    ArithmeticKind, Error, InputField, Result, Stage, ValidationError, Violation,
};
pub use policy::QuantityClass;
pub use sensitivity::{SensitivityAxes, SensitivityCell, SensitivityEngine, SensitivityGrid};
pub use stats::ValuationStats;
pub use terminal::TerminalValue;
pub use validator::Validator;
