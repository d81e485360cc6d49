use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core.
///
/// Every failure is local and recoverable: no variant implies a partially
/// updated engine, and callers may retry with corrected inputs.
#[derive(Debug, Error)]
pub enum Error {
    /// Case selector outside the supported set {1, 2, 3}.
    #[error("invalid case number: {0} (expected 1, 2, or 3)")]
    InvalidCase(u32),

    /// Requested more particle slots than the fixed buffer holds.
    #[error("capacity exceeded: requested {requested} particles, maximum is {max}")]
    CapacityExceeded { requested: usize, max: usize },

    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Slot index at or past the active count.
    #[error("particle index {index} out of range (active count {active})")]
    IndexOutOfRange { index: usize, active: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidParam("jump length must be > 0".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid parameter"));
        assert!(msg.contains("jump length"));
    }

    #[test]
    fn capacity_error_reports_both_sides() {
        let e = Error::CapacityExceeded {
            requested: 6000,
            max: 5000,
        };
        let msg = format!("{e}");
        assert!(msg.contains("6000"));
        assert!(msg.contains("5000"));
    }
}
