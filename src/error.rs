//! Error types for the boundaries that count as real failure modes.
//! Everything else (unknown stop/bus, unreachable destination) is a
//! plain query-result value, never an `Err` — see the query-result enums
//! in [`crate::catalogue`] and [`crate::transport_router`].

/// Raised by [`crate::transport_router::RouterSettings::new`] when a
/// caller-supplied setting falls outside the contracted range.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum RouterSettingsError {
    #[error("bus_wait_time must be within [1, 1000] minutes, got {0}")]
    WaitTimeOutOfRange(u32),
    #[error("bus_velocity must be within (1, 1000] km/h, got {0}")]
    VelocityOutOfRange(f64),
}
