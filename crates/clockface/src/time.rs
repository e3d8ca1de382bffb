use crate::error::ClockError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_HOUR: i64 = 60;
pub const HOURS_PER_DAY: i64 = 24;
pub const MINUTES_PER_DAY: i64 = MINUTES_PER_HOUR * HOURS_PER_DAY;

/// A time of day as shown on the face.
///
/// `hour` is always in `[0, 23]` and `minute` in `[0, 60)`. The minute keeps
/// its fractional part so the minute hand can sit between ticks when it moves
/// smoothly. Every constructor normalises with carry, so out-of-range input
/// wraps instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeValue {
    hour: u8,
    minute: f64,
}

impl TimeValue {
    pub const MIDNIGHT: TimeValue = TimeValue {
        hour: 0,
        minute: 0.0,
    };

    /// Whole hour and minute, wrapping minutes into the hour and hours modulo 24.
    pub fn new(hour: i64, minute: i64) -> Self {
        let total = (hour.rem_euclid(HOURS_PER_DAY) * MINUTES_PER_HOUR
            + minute.rem_euclid(MINUTES_PER_DAY))
        .rem_euclid(MINUTES_PER_DAY);
        Self {
            hour: (total / MINUTES_PER_HOUR) as u8,
            minute: (total % MINUTES_PER_HOUR) as f64,
        }
    }

    /// Hour plus a possibly fractional minute.
    pub fn with_fraction(hour: i64, minute: f64) -> Self {
        Self::from_minutes((hour.rem_euclid(HOURS_PER_DAY) * MINUTES_PER_HOUR) as f64 + minute)
    }

    /// Minutes since midnight, any real value. Non-finite input yields midnight.
    pub fn from_minutes(total: f64) -> Self {
        if !total.is_finite() {
            return Self::MIDNIGHT;
        }
        let day = MINUTES_PER_DAY as f64;
        let mut total = total.rem_euclid(day);
        if total >= day {
            total = 0.0;
        }
        let hour = ((total / MINUTES_PER_HOUR as f64).floor() as u8).min(23);
        let minute = (total - f64::from(hour) * MINUTES_PER_HOUR as f64).clamp(0.0, 60.0);
        if minute >= 60.0 {
            return Self::from_minutes(f64::from(hour + 1) * MINUTES_PER_HOUR as f64);
        }
        Self { hour, minute }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Whole minute, dropping any sub-minute progress.
    pub fn minute(&self) -> u8 {
        self.minute.floor() as u8
    }

    /// Minute including sub-minute progress, in `[0, 60)`.
    pub fn exact_minute(&self) -> f64 {
        self.minute
    }

    /// Hour position on a 12-hour dial, in `[0, 11]`.
    pub fn dial_hour(&self) -> u8 {
        self.hour % 12
    }

    pub fn is_am(&self) -> bool {
        self.hour < 12
    }

    pub fn total_minutes(&self) -> f64 {
        f64::from(self.hour) * MINUTES_PER_HOUR as f64 + self.minute
    }

    pub fn is_whole_minute(&self) -> bool {
        self.minute.fract() == 0.0
    }

    pub fn add_minutes(&self, delta: f64) -> Self {
        Self::from_minutes(self.total_minutes() + delta)
    }

    /// Rounds to the nearest whole minute, carrying 60 into the hour.
    pub fn snapped(&self) -> Self {
        Self::from_minutes(self.total_minutes().round())
    }

    /// Same minute, different hour.
    pub fn with_hour(&self, hour: i64) -> Self {
        Self::with_fraction(hour, self.minute)
    }

    /// Same hour, different minute. Minutes outside `[0, 59]` carry into the hour.
    pub fn with_minute(&self, minute: i64) -> Self {
        Self::new(i64::from(self.hour), minute)
    }

    /// This time as seen in a zone `offset` ahead of the reference zone.
    pub fn offset_by(&self, offset: ZoneOffset) -> Self {
        self.add_minutes(offset.as_minutes())
    }

    /// Inverse of [`TimeValue::offset_by`].
    pub fn offset_back(&self, offset: ZoneOffset) -> Self {
        self.add_minutes(-offset.as_minutes())
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute())
    }
}

/// Signed offset from the reference zone to the displayed zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneOffset {
    seconds: i32,
}

impl ZoneOffset {
    pub const ZERO: ZoneOffset = ZoneOffset { seconds: 0 };

    pub fn from_seconds(seconds: i32) -> Self {
        Self { seconds }
    }

    /// Combines a separate hour and minute offset, each signed.
    pub fn from_hours_minutes(hours: i32, minutes: i32) -> Self {
        Self {
            seconds: hours.saturating_mul(3600).saturating_add(minutes.saturating_mul(60)),
        }
    }

    pub fn seconds(&self) -> i32 {
        self.seconds
    }

    /// Whole hours, truncated towards zero.
    pub fn hours(&self) -> i32 {
        self.seconds / 3600
    }

    /// Remaining minutes after [`ZoneOffset::hours`], carrying the same sign.
    pub fn minutes(&self) -> i32 {
        (self.seconds % 3600) / 60
    }

    pub fn as_minutes(&self) -> f64 {
        f64::from(self.seconds) / 60.0
    }
}

impl fmt::Display for ZoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.seconds < 0 { '-' } else { '+' };
        write!(
            f,
            "{}{:02}:{:02}",
            sign,
            self.hours().unsigned_abs(),
            self.minutes().unsigned_abs()
        )
    }
}

impl FromStr for ZoneOffset {
    type Err = ClockError;

    /// Parses `+HH:MM`, `-HH:MM`, `HH:MM` or a bare signed hour count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClockError::InvalidOffset(s.to_string());
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (hours, minutes) = match body.split_once(':') {
            Some((h, m)) => (h, m),
            None => (body, "0"),
        };
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if !(0..60).contains(&minutes) || !(0..=24).contains(&hours) {
            return Err(invalid());
        }
        let offset = Self::from_hours_minutes(hours, minutes);
        Ok(if negative {
            Self::from_seconds(-offset.seconds)
        } else {
            offset
        })
    }
}
