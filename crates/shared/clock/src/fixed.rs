use chrono::{TimeZone, Utc};
use intrinsic_core::Timestamp;
use intrinsic_ports::Clock;

/// Clock frozen at one instant
///
/// Two valuations stamped by the same `FixedClock` carry identical
/// timestamps, which makes whole outputs comparable in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: Timestamp,
}

impl FixedClock {
    pub fn at(instant: Timestamp) -> Self {
        Self { instant }
    }

    /// Midnight UTC on 1 January 2024
    pub fn epoch() -> Self {
        let instant = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_default();
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.instant
    }

    fn name(&self) -> &str {
        "FixedClock"
    }
}
