use crate::angle::Hand;
use thiserror::Error;

/// Contract violations in clock configuration.
///
/// Out-of-range times are never errors (they are normalised); these only
/// come from configuration a caller should not have produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClockError {
    #[error("Animation duration must be finite and non-negative, got {0} ms")]
    InvalidDuration(f64),
    #[error("Hit tolerance must be finite and positive, got {0}")]
    InvalidTolerance(f64),
    #[error("{hand} hand length must be within (0, 1], got {length}")]
    InvalidHandLength { hand: Hand, length: f64 },
    #[error("Invalid color '{0}', expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),
    #[error("Invalid zone offset '{0}', expected [+-]HH:MM")]
    InvalidOffset(String),
}
