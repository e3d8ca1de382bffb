//! Conversions between clock times, hand angles and touch positions.
//!
//! All angles are [`Degrees`] measured clockwise from 12 o'clock. The hour
//! hand is coupled to the minute hand: it advances half a degree per minute,
//! so it never jumps when the hour changes.

use crate::geometry::{Degrees, Point};
use crate::time::{MINUTES_PER_HOUR, TimeValue};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter};

pub const DEGREES_PER_HOUR: f64 = 30.0;
pub const DEGREES_PER_MINUTE: f64 = 6.0;
pub const HOUR_HAND_DEGREES_PER_MINUTE: f64 = 0.5;

// absorbs atan2 noise right below an hour boundary
const HOUR_BOUNDARY_EPSILON: f64 = 1e-9;
// hit distances closer than this count as a tie
const HIT_TIE_EPSILON: f64 = 1e-9;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, StrumDisplay,
)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    #[strum(serialize = "hour")]
    Hour,
    #[strum(serialize = "minute")]
    Minute,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandAngles {
    pub hour: Degrees,
    pub minute: Degrees,
}

impl HandAngles {
    pub fn new(hour: Degrees, minute: Degrees) -> Self {
        Self { hour, minute }
    }

    pub fn get(&self, hand: Hand) -> Degrees {
        match hand {
            Hand::Hour => self.hour,
            Hand::Minute => self.minute,
        }
    }
}

/// Absolute tip distance of each hand from the face center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandReach {
    pub hour: f64,
    pub minute: f64,
}

impl HandReach {
    pub fn get(&self, hand: Hand) -> f64 {
        match hand {
            Hand::Hour => self.hour,
            Hand::Minute => self.minute,
        }
    }
}

pub fn angles_for_time(time: &TimeValue) -> HandAngles {
    let minute = time.exact_minute();
    HandAngles {
        hour: Degrees(
            f64::from(time.dial_hour()) * DEGREES_PER_HOUR + minute * HOUR_HAND_DEGREES_PER_MINUTE,
        ),
        minute: Degrees(minute * DEGREES_PER_MINUTE),
    }
}

/// Inverse of [`angles_for_time`].
///
/// The minute comes from the minute angle, rounded to a whole minute when
/// `snap_to_minute` is set (60 carries into the hour). The hour comes from the
/// sector the hour hand points into. AM/PM is taken from `previous`: moving
/// the hour hand across 12 steps into the other half of the day, in whichever
/// direction is shorter.
pub fn time_for_angles(
    hour_angle: Degrees,
    minute_angle: Degrees,
    snap_to_minute: bool,
    previous: &TimeValue,
) -> TimeValue {
    let mut minute = minute_angle.normalized().value() / DEGREES_PER_MINUTE;
    if snap_to_minute {
        minute = minute.round();
    }

    let dial_hour = ((hour_angle.normalized().value() / DEGREES_PER_HOUR + HOUR_BOUNDARY_EPSILON)
        .floor() as i64)
        .rem_euclid(12);
    let step = (dial_hour - i64::from(previous.dial_hour())).rem_euclid(12);
    let step = if step > 6 { step - 12 } else { step };

    TimeValue::with_fraction(i64::from(previous.hour()) + step, minute)
}

/// The time closest to a pose whose hands may be out of step, as they are
/// partway through an animation.
///
/// The minute hand is kept exactly; the hour is whichever one puts the hour
/// hand nearest `hour_angle`. The result is the candidate within six hours
/// of `previous`, so it stays in the same stretch of the day.
pub fn time_nearest_angles(
    hour_angle: Degrees,
    minute_angle: Degrees,
    previous: &TimeValue,
) -> TimeValue {
    let half_day = (MINUTES_PER_HOUR * 12) as f64;
    let minute = minute_angle.normalized().value() / DEGREES_PER_MINUTE;
    let hour_minutes = hour_angle.normalized().value() / HOUR_HAND_DEGREES_PER_MINUTE;
    let hours = ((hour_minutes - minute) / MINUTES_PER_HOUR as f64).round();

    let dial_minutes = (hours * MINUTES_PER_HOUR as f64 + minute).rem_euclid(half_day);
    let delta = (dial_minutes - previous.total_minutes().rem_euclid(half_day)).rem_euclid(half_day);
    let delta = if delta > half_day / 2.0 {
        delta - half_day
    } else {
        delta
    };
    previous.add_minutes(delta)
}

/// Angle of `point` around `center`, in `[0, 360)`.
///
/// Uses screen coordinates (y grows downwards). A point just left of 12
/// o'clock yields an angle just below 360, never a negative one. The center
/// itself maps to 0.
pub fn touch_to_angle(point: Point, center: Point) -> Degrees {
    let dx = point.x - center.x;
    let up = center.y - point.y;
    Degrees(dx.atan2(up).to_degrees()).normalized()
}

/// Picks the hand whose drawn segment is closest to `point`.
///
/// Returns `None` when neither hand is within `tolerance`. Equal distances
/// go to the minute hand, which is drawn on top.
pub fn nearest_hand(
    point: Point,
    center: Point,
    hands: HandAngles,
    reach: HandReach,
    tolerance: f64,
) -> Option<Hand> {
    let distance = |hand: Hand| {
        let tip = center.polar_offset(reach.get(hand), hands.get(hand));
        point.distance_to_segment(center, tip)
    };
    let (hour, minute) = (distance(Hand::Hour), distance(Hand::Minute));

    match (hour <= tolerance, minute <= tolerance) {
        (false, false) => None,
        (true, false) => Some(Hand::Hour),
        (false, true) => Some(Hand::Minute),
        (true, true) if hour + HIT_TIE_EPSILON < minute => Some(Hand::Hour),
        (true, true) => Some(Hand::Minute),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;
    const CENTER: Point = Point { x: 100.0, y: 100.0 };
    const REACH: HandReach = HandReach {
        hour: 50.0,
        minute: 80.0,
    };

    #[test]
    fn test_angles_for_time() {
        let angles = angles_for_time(&TimeValue::new(15, 30));
        assert_eq!(angles.hour, Degrees(105.0));
        assert_eq!(angles.minute, Degrees(180.0));

        let angles = angles_for_time(&TimeValue::with_fraction(0, 30.5));
        assert_eq!(angles.minute, Degrees(183.0));
        assert_eq!(angles.hour, Degrees(15.25));
    }

    #[test]
    fn test_round_trip_every_minute_of_the_day() {
        for hour in 0..24 {
            for minute in 0..60 {
                let time = TimeValue::new(hour, minute);
                let angles = angles_for_time(&time);
                let back = time_for_angles(angles.hour, angles.minute, true, &time);
                assert_eq!(back, time, "round trip of {time}");

                let previous = TimeValue::new(hour, 0);
                let back = time_for_angles(angles.hour, angles.minute, true, &previous);
                assert_eq!(back, time, "round trip of {time} from top of hour");
            }
        }
    }

    #[test]
    fn test_hour_hand_is_continuous_across_the_hour() {
        for hour in 0..24 {
            let before = angles_for_time(&TimeValue::new(hour, 59)).hour;
            let after = angles_for_time(&TimeValue::new(hour + 1, 0)).hour;
            assert!(
                (before.signed_delta_to(after) - HOUR_HAND_DEGREES_PER_MINUTE).abs() < EPS,
                "hour {hour}"
            );
        }
    }

    #[test]
    fn test_snap_rounds_minute_angle() {
        let previous = TimeValue::new(3, 0);
        let snapped = time_for_angles(Degrees(90.0), Degrees(182.0), true, &previous);
        assert_eq!((snapped.hour(), snapped.exact_minute()), (3, 30.0));

        let smooth = time_for_angles(Degrees(90.0), Degrees(182.0), false, &previous);
        assert!((smooth.exact_minute() - 30.0 - 1.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_snap_to_sixty_carries_into_hour() {
        let previous = TimeValue::new(4, 59);
        let time = time_for_angles(Degrees(149.5), Degrees(359.0), true, &previous);
        assert_eq!((time.hour(), time.minute()), (5, 0));
    }

    #[test]
    fn test_hour_hand_past_twelve_toggles_day_half() {
        let forward = time_for_angles(Degrees(5.0), Degrees(0.0), true, &TimeValue::new(11, 0));
        assert_eq!(forward.hour(), 12);

        let backward = time_for_angles(Degrees(335.0), Degrees(0.0), true, &TimeValue::new(12, 0));
        assert_eq!(backward.hour(), 11);

        let midnight = time_for_angles(Degrees(5.0), Degrees(0.0), true, &TimeValue::new(23, 0));
        assert_eq!(midnight.hour(), 0);

        let same_half = time_for_angles(Degrees(95.0), Degrees(0.0), true, &TimeValue::new(14, 0));
        assert_eq!(same_half.hour(), 15);
    }

    #[test]
    fn test_touch_to_angle_cardinals() {
        let cases = vec![
            (Point::new(100.0, 50.0), 0.0),
            (Point::new(150.0, 100.0), 90.0),
            (Point::new(100.0, 150.0), 180.0),
            (Point::new(50.0, 100.0), 270.0),
        ];
        for (point, expected) in cases {
            assert!((touch_to_angle(point, CENTER).value() - expected).abs() < EPS);
        }
        assert_eq!(touch_to_angle(CENTER, CENTER), Degrees(0.0));
    }

    #[test]
    fn test_touch_to_angle_left_of_twelve_is_near_360() {
        let angle = touch_to_angle(Point::new(99.9, 50.0), CENTER).value();
        assert!(angle > 359.0 && angle < 360.0);
    }

    #[test]
    fn test_nearest_hand_picks_closer_segment() {
        // 3:00 -> hour hand points right, minute hand up
        let hands = angles_for_time(&TimeValue::new(3, 0));
        let near_hour = Point::new(130.0, 102.0);
        let near_minute = Point::new(102.0, 40.0);
        assert_eq!(nearest_hand(near_hour, CENTER, hands, REACH, 12.0), Some(Hand::Hour));
        assert_eq!(nearest_hand(near_minute, CENTER, hands, REACH, 12.0), Some(Hand::Minute));
    }

    #[test]
    fn test_nearest_hand_rejects_empty_face() {
        let hands = angles_for_time(&TimeValue::new(3, 0));
        let empty = Point::new(60.0, 150.0);
        assert_eq!(nearest_hand(empty, CENTER, hands, REACH, 12.0), None);
    }

    #[test]
    fn test_nearest_hand_tie_goes_to_minute() {
        // hands at 0 and 90 degrees, touch on the 45 degree bisector
        let hands = HandAngles::new(Degrees(90.0), Degrees(0.0));
        let touch = CENTER.polar_offset(30.0, Degrees(45.0));
        assert_eq!(nearest_hand(touch, CENTER, hands, REACH, 25.0), Some(Hand::Minute));
    }

    #[test]
    fn test_nearest_time_matches_consistent_pose() {
        for time in [TimeValue::new(2, 0), TimeValue::new(15, 45), TimeValue::new(23, 59)] {
            let pose = angles_for_time(&time);
            let nearest = time_nearest_angles(pose.hour, pose.minute, &time);
            assert!((nearest.total_minutes() - time.total_minutes()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_nearest_time_keeps_minute_hand_of_skewed_pose() {
        // on the way from 3:00 to 3:40 the minute hand goes back through 10
        let previous = TimeValue::new(3, 0);
        let nearest = time_nearest_angles(Degrees(97.0), Degrees(300.0), &previous);
        assert_eq!((nearest.hour(), nearest.exact_minute()), (2, 50.0));
        let pose = angles_for_time(&nearest);
        assert!(pose.minute.distance_to(Degrees(300.0)) < EPS);
        assert!(pose.hour.distance_to(Degrees(97.0)) <= 15.0);
    }

    #[test]
    fn test_nearest_time_stays_near_previous_across_noon() {
        let previous = TimeValue::new(11, 59);
        let nearest = time_nearest_angles(Degrees(0.5), Degrees(6.0), &previous);
        assert_eq!((nearest.hour(), nearest.minute()), (12, 1));
    }
}
