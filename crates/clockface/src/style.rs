use crate::angle::{Hand, HandReach};
use crate::error::ClockError;
use palette::{Srgb, Srgba};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// An sRGB colour with alpha, written as `#rgb`, `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, SerializeDisplay, DeserializeFromStr)]
pub struct Color(Srgba<f64>);

impl Color {
    pub fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self(Srgba::new(red, green, blue, alpha))
    }

    pub fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub fn into_components(self) -> (f64, f64, f64, f64) {
        self.0.into_components()
    }

    pub fn as_srgba(&self) -> &Srgba<f64> {
        &self.0
    }
}

impl From<Srgba<f64>> for Color {
    fn from(color: Srgba<f64>) -> Self {
        Self(color)
    }
}

impl FromStr for Color {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClockError::InvalidColor(s.to_string());
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let (rgb, alpha) = match hex.len() {
            3 | 6 => (hex, u8::MAX),
            8 => (
                &hex[..6],
                u8::from_str_radix(&hex[6..], 16).map_err(|_| invalid())?,
            ),
            _ => return Err(invalid()),
        };
        let rgb: Srgb<u8> = rgb.parse().map_err(|_| invalid())?;
        let channel = |c: u8| f64::from(c) / 255.0;
        Ok(Self::rgba(
            channel(rgb.red),
            channel(rgb.green),
            channel(rgb.blue),
            channel(alpha),
        ))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b, a) = self.into_components();
        let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(f, "#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b))?;
        if a < 1.0 {
            write!(f, "{:02x}", byte(a))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAttributes {
    pub family: String,
    /// Font size in pixels.
    pub size: f64,
    pub color: Color,
    pub bold: bool,
}

impl TextAttributes {
    fn new(size: f64, color: Color, bold: bool) -> Self {
        Self {
            family: "Sans".to_string(),
            size,
            color,
            bold,
        }
    }
}

impl Default for TextAttributes {
    fn default() -> Self {
        Self::new(14.0, Color::rgb(0.0, 0.0, 0.0), false)
    }
}

/// Everything about how the face looks. None of it affects behaviour.
///
/// Lengths, thicknesses and insets are in pixels; hand lengths are fractions
/// of the face radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockStyle {
    pub title: String,
    pub subtitle: String,
    pub title_attributes: TextAttributes,
    pub subtitle_attributes: TextAttributes,
    pub digit_attributes: TextAttributes,
    pub show_digits: bool,

    pub face_color: Color,

    pub major_marking_color: Color,
    pub minor_marking_color: Color,
    pub major_markings_thickness: f64,
    pub minor_markings_thickness: f64,
    pub major_markings_length: f64,
    pub minor_markings_length: f64,
    pub markings_inset: f64,

    pub hour_hand_color: Color,
    pub minute_hand_color: Color,
    pub hour_hand_thickness: f64,
    pub minute_hand_thickness: f64,
    pub hour_hand_length: f64,
    pub minute_hand_length: f64,

    pub border_color: Color,
    pub border_width: f64,
}

impl Default for ClockStyle {
    fn default() -> Self {
        let ink = Color::rgb(0.1, 0.1, 0.1);
        Self {
            title: String::new(),
            subtitle: String::new(),
            title_attributes: TextAttributes::new(16.0, ink, true),
            subtitle_attributes: TextAttributes::new(12.0, Color::rgb(0.4, 0.4, 0.4), false),
            digit_attributes: TextAttributes::new(14.0, ink, false),
            show_digits: false,
            face_color: Color::rgb(1.0, 1.0, 1.0),
            major_marking_color: ink,
            minor_marking_color: Color::rgb(0.5, 0.5, 0.5),
            major_markings_thickness: 3.0,
            minor_markings_thickness: 1.0,
            major_markings_length: 10.0,
            minor_markings_length: 5.0,
            markings_inset: 4.0,
            hour_hand_color: ink,
            minute_hand_color: ink,
            hour_hand_thickness: 6.0,
            minute_hand_thickness: 3.0,
            hour_hand_length: 0.5,
            minute_hand_length: 0.8,
            border_color: ink,
            border_width: 2.0,
        }
    }
}

impl ClockStyle {
    pub fn hand_length(&self, hand: Hand) -> f64 {
        match hand {
            Hand::Hour => self.hour_hand_length,
            Hand::Minute => self.minute_hand_length,
        }
    }

    pub fn hand_thickness(&self, hand: Hand) -> f64 {
        match hand {
            Hand::Hour => self.hour_hand_thickness,
            Hand::Minute => self.minute_hand_thickness,
        }
    }

    pub fn hand_color(&self, hand: Hand) -> Color {
        match hand {
            Hand::Hour => self.hour_hand_color,
            Hand::Minute => self.minute_hand_color,
        }
    }

    /// Hand tip distances for a face of the given radius.
    pub fn hand_reach(&self, radius: f64) -> HandReach {
        HandReach {
            hour: radius * self.hour_hand_length,
            minute: radius * self.minute_hand_length,
        }
    }

    pub fn validate(&self) -> Result<(), ClockError> {
        for hand in Hand::iter() {
            let length = self.hand_length(hand);
            if !(length > 0.0 && length <= 1.0) {
                return Err(ClockError::InvalidHandLength { hand, length });
            }
        }
        Ok(())
    }
}
