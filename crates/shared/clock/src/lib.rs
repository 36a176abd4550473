//! Intrinsic Clock Infrastructure
//!
//! Time sources used to stamp valuation outputs:
//!
//! - [`SystemClock`]: wall-clock UTC time, for production
//! - [`FixedClock`]: a frozen instant, for deterministic tests and replays
//!
//! ## Usage
//!
//! ```ignore
//! use intrinsic_clock::{Clock, FixedClock, SystemClock};
//!
//! let live = SystemClock::new();
//! let frozen = FixedClock::at(live.now());
//! assert_eq!(frozen.now(), frozen.now());
//! ```

mod fixed;
mod system;

pub use fixed::FixedClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use intrinsic_ports::Clock;
