use intrinsic_core::Timestamp;

/// Port for time abstraction
///
/// Valuations are stamped with the time they were computed:
/// - Real system time in production
/// - Fixed time for deterministic tests
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
