use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point at `distance` from `self` in the direction of `angle`, measured
    /// clockwise from 12 o'clock in screen coordinates (y grows downwards).
    pub fn polar_offset(self, distance: f64, angle: Degrees) -> Self {
        let rad = angle.0.to_radians();
        Self {
            x: self.x + distance * rad.sin(),
            y: self.y - distance * rad.cos(),
        }
    }

    /// Distance from `self` to the segment `a`-`b`.
    pub fn distance_to_segment(self, a: Point, b: Point) -> f64 {
        let (abx, aby) = (b.x - a.x, b.y - a.y);
        let len_sq = abx * abx + aby * aby;
        if len_sq == 0.0 {
            return self.distance_to(a);
        }
        let t = (((self.x - a.x) * abx + (self.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
        self.distance_to(Point::new(a.x + t * abx, a.y + t * aby))
    }
}

/// The circle the face occupies, in the host's local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceGeometry {
    pub center: Point,
    pub radius: f64,
}

impl FaceGeometry {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Largest circle centred in a `width` x `height` area.
    pub fn from_bounds(width: f64, height: f64) -> Self {
        Self {
            center: Point::new(width / 2.0, height / 2.0),
            radius: (width.min(height) / 2.0).max(0.0),
        }
    }
}

impl Default for FaceGeometry {
    fn default() -> Self {
        Self::from_bounds(200.0, 200.0)
    }
}

/// An angle on the clock face in degrees, origin at 12 o'clock, increasing
/// clockwise.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Display, From, Into)]
#[display("{_0}°")]
pub struct Degrees(pub f64);

impl Degrees {
    pub const FULL_TURN: f64 = 360.0;

    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Wraps into `[0, 360)`.
    pub fn normalized(self) -> Self {
        let wrapped = self.0.rem_euclid(Self::FULL_TURN);
        // rem_euclid can round up to the modulus for tiny negative inputs
        if wrapped >= Self::FULL_TURN {
            Self(0.0)
        } else {
            Self(wrapped)
        }
    }

    /// Shortest signed rotation from `self` to `target`, in `(-180, 180]`.
    /// Positive is clockwise.
    pub fn signed_delta_to(self, target: Degrees) -> f64 {
        let delta = target.0 - self.0;
        if !delta.is_finite() {
            return 0.0;
        }
        let wrapped = delta.rem_euclid(Self::FULL_TURN);
        if wrapped > 180.0 { wrapped - Self::FULL_TURN } else { wrapped }
    }

    /// Unsigned shortest distance to `other`, in `[0, 180]`.
    pub fn distance_to(self, other: Degrees) -> f64 {
        self.signed_delta_to(other).abs()
    }

    pub fn rotated(self, delta: f64) -> Self {
        Self(self.0 + delta).normalized()
    }
}
