use crate::animation::{Easing, duration_from_millis};
use crate::error::ClockError;
use crate::time::ZoneOffset;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings that change how the face reacts, as opposed to how it looks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Behavior {
    /// Let the minute hand rest between ticks while dragging instead of
    /// snapping to whole minutes.
    pub minute_hand_moves_smoothly: bool,
    pub animation_duration_ms: f64,
    pub easing: Easing,
    /// How far from a hand a touch may land and still grab it, as a fraction
    /// of the face radius.
    pub hit_tolerance: f64,
    /// Offset of the displayed zone from the zone times are set in.
    pub utc_offset_seconds: ZoneOffset,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            minute_hand_moves_smoothly: false,
            animation_duration_ms: 300.0,
            easing: Easing::Linear,
            hit_tolerance: 0.15,
            utc_offset_seconds: ZoneOffset::ZERO,
        }
    }
}

impl Behavior {
    pub fn animation_duration(&self) -> Result<Duration, ClockError> {
        duration_from_millis(self.animation_duration_ms)
    }

    pub fn validate(&self) -> Result<(), ClockError> {
        self.animation_duration()?;
        if !self.hit_tolerance.is_finite() || self.hit_tolerance <= 0.0 {
            return Err(ClockError::InvalidTolerance(self.hit_tolerance));
        }
        Ok(())
    }
}
