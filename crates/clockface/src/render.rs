//! What a renderer needs to draw the face.
//!
//! [`FaceScene`] does all of the clock geometry up front: marking segments,
//! digit anchors, hand strokes and text anchors. A [`FaceRenderer`] only
//! strokes, fills and places text.

use crate::angle::{DEGREES_PER_HOUR, DEGREES_PER_MINUTE, Hand, HandAngles};
use crate::geometry::{Degrees, FaceGeometry, Point};
use crate::style::{ClockStyle, Color};
use crate::time::TimeValue;

pub const MARKING_COUNT: u32 = 60;
pub const MINUTES_PER_MAJOR_MARKING: u32 = 5;

// how far from the center the title and subtitle sit, as a fraction of the radius
const TEXT_OFFSET: f64 = 0.4;

pub trait FaceRenderer {
    type Error;

    fn render(&mut self, scene: &FaceScene<'_>) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marking {
    /// Outer end.
    pub start: Point,
    /// Inner end.
    pub end: Point,
    pub major: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Digit {
    pub value: u8,
    /// Where the digit's center goes.
    pub anchor: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandStroke {
    pub from: Point,
    pub to: Point,
    pub thickness: f64,
    pub color: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct FaceScene<'a> {
    pub geometry: FaceGeometry,
    pub style: &'a ClockStyle,
    pub pose: HandAngles,
    /// The time the pose reads as. Transient while dragging or animating.
    pub time: TimeValue,
}

impl<'a> FaceScene<'a> {
    pub fn new(
        geometry: FaceGeometry,
        style: &'a ClockStyle,
        pose: HandAngles,
        time: TimeValue,
    ) -> Self {
        Self {
            geometry,
            style,
            pose,
            time,
        }
    }

    pub fn is_am(&self) -> bool {
        self.time.is_am()
    }

    /// Radius the border is stroked at, so the stroke stays inside the face.
    pub fn border_radius(&self) -> f64 {
        (self.geometry.radius - self.style.border_width / 2.0).max(0.0)
    }

    fn markings_radius(&self) -> f64 {
        self.geometry.radius - self.style.border_width - self.style.markings_inset
    }

    pub fn markings(&self) -> impl Iterator<Item = Marking> + '_ {
        let outer = self.markings_radius();
        let center = self.geometry.center;
        (0..MARKING_COUNT).map(move |i| {
            let major = i % MINUTES_PER_MAJOR_MARKING == 0;
            let length = if major {
                self.style.major_markings_length
            } else {
                self.style.minor_markings_length
            };
            let angle = Degrees(f64::from(i) * DEGREES_PER_MINUTE);
            Marking {
                start: center.polar_offset(outer, angle),
                end: center.polar_offset(outer - length, angle),
                major,
            }
        })
    }

    /// Hour numerals 1 to 12, inside the major markings. Empty unless digits
    /// are enabled.
    pub fn digits(&self) -> impl Iterator<Item = Digit> + '_ {
        let ring = self.markings_radius()
            - self.style.major_markings_length
            - self.style.digit_attributes.size;
        let center = self.geometry.center;
        let count = if self.style.show_digits { 12 } else { 0 };
        (1..=count).map(move |value: u8| Digit {
            value,
            anchor: center.polar_offset(ring, Degrees(f64::from(value) * DEGREES_PER_HOUR)),
        })
    }

    pub fn hand(&self, hand: Hand) -> HandStroke {
        let reach = self.geometry.radius * self.style.hand_length(hand);
        HandStroke {
            from: self.geometry.center,
            to: self.geometry.center.polar_offset(reach, self.pose.get(hand)),
            thickness: self.style.hand_thickness(hand),
            color: self.style.hand_color(hand),
        }
    }

    pub fn title_anchor(&self) -> Option<Point> {
        (!self.style.title.is_empty()).then(|| {
            Point::new(
                self.geometry.center.x,
                self.geometry.center.y - self.geometry.radius * TEXT_OFFSET,
            )
        })
    }

    pub fn subtitle_anchor(&self) -> Option<Point> {
        (!self.style.subtitle.is_empty()).then(|| {
            Point::new(
                self.geometry.center.x,
                self.geometry.center.y + self.geometry.radius * TEXT_OFFSET,
            )
        })
    }
}
