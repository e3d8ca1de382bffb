use crate::angle::{
    DEGREES_PER_MINUTE, Hand, HandAngles, HandReach, angles_for_time, nearest_hand,
    time_for_angles, touch_to_angle,
};
use crate::geometry::{Degrees, Point};
use crate::time::TimeValue;

/// Where the hands are on screen and how forgiving hit-testing is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitArea {
    pub center: Point,
    pub reach: HandReach,
    /// Maximum distance from a hand's segment that still grabs it. Also the
    /// radius around the center inside which moves are ignored.
    pub tolerance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub hand: Hand,
    pub start_angle: Degrees,
    pub current_angle: Degrees,
    /// Time the drag started from.
    pub baseline: TimeValue,
    /// Unsnapped position, so sub-minute motion accumulates across moves.
    raw: TimeValue,
    /// Time the face shows while the drag is in progress.
    pub candidate: TimeValue,
    /// Hands as they were drawn when grabbed. Shown until the first move.
    pub start_pose: HandAngles,
    moved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(Drag),
}

/// Turns pointer drags into candidate times.
///
/// State machine: Idle -> Dragging -> Idle. The grabbed hand is fixed for the
/// whole drag. Candidates are scratch values; only [`GestureController::drag_end`]
/// produces a committed time.
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    state: GestureState,
    snap_to_minute: bool,
}

impl GestureController {
    pub fn new(snap_to_minute: bool) -> Self {
        Self {
            state: GestureState::Idle,
            snap_to_minute,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    pub fn active_hand(&self) -> Option<Hand> {
        match &self.state {
            GestureState::Dragging(drag) => Some(drag.hand),
            GestureState::Idle => None,
        }
    }

    pub fn candidate(&self) -> Option<TimeValue> {
        match &self.state {
            GestureState::Dragging(drag) => Some(drag.candidate),
            GestureState::Idle => None,
        }
    }

    /// Candidate time and where the hands are drawn for it.
    pub fn view(&self) -> Option<(TimeValue, HandAngles)> {
        match &self.state {
            GestureState::Dragging(drag) => Some((drag.candidate, drag.pose())),
            GestureState::Idle => None,
        }
    }

    pub fn snap_to_minute(&self) -> bool {
        self.snap_to_minute
    }

    /// Takes effect from the next move, including during a drag.
    pub fn set_snap_to_minute(&mut self, snap: bool) {
        self.snap_to_minute = snap;
    }

    /// Grabs the hand nearest to `point`, hit-testing against `pose` as drawn.
    /// Returns `None` and stays idle when the touch is not on either hand.
    ///
    /// `current` is the time the drag builds on. It normally reads as `pose`;
    /// mid-animation the hands can be out of step, and `current` is then the
    /// closest real time.
    pub fn drag_start(
        &mut self,
        point: Point,
        current: TimeValue,
        pose: HandAngles,
        area: &HitArea,
    ) -> Option<Hand> {
        let Some(hand) = nearest_hand(point, area.center, pose, area.reach, area.tolerance) else {
            log::debug!("Drag at ({:.1}, {:.1}) missed both hands", point.x, point.y);
            self.state = GestureState::Idle;
            return None;
        };

        let start_angle = touch_to_angle(point, area.center);
        log::debug!("Grabbed {} hand at {:.1} from {}", hand, start_angle.value(), current);
        self.state = GestureState::Dragging(Drag {
            hand,
            start_angle,
            current_angle: start_angle,
            baseline: current,
            raw: current,
            candidate: current,
            start_pose: pose,
            moved: false,
        });
        Some(hand)
    }

    /// Moves the grabbed hand to `point` and returns the new candidate.
    ///
    /// Returns `None` when idle, or when `point` is too close to the center
    /// for its angle to mean anything.
    pub fn drag_move(&mut self, point: Point, area: &HitArea) -> Option<TimeValue> {
        let snap = self.snap_to_minute;
        let GestureState::Dragging(drag) = &mut self.state else {
            return None;
        };
        if point.distance_to(area.center) <= area.tolerance {
            return None;
        }

        let angle = touch_to_angle(point, area.center);
        drag.current_angle = angle;
        drag.moved = true;

        match drag.hand {
            Hand::Minute => {
                // follow the hand around so crossing 12 carries into the hour
                let delta = angles_for_time(&drag.raw).minute.signed_delta_to(angle);
                drag.raw = drag.raw.add_minutes(delta / DEGREES_PER_MINUTE);
                drag.candidate = if snap { drag.raw.snapped() } else { drag.raw };
            }
            Hand::Hour => {
                let minute_angle = angles_for_time(&drag.candidate).minute;
                drag.candidate = time_for_angles(angle, minute_angle, false, &drag.candidate);
                drag.raw = drag.candidate;
            }
        }

        log::trace!("Dragging {} hand to {:.2}: {}", drag.hand, angle.value(), drag.candidate);
        Some(drag.candidate)
    }

    /// Finishes the drag and returns the time to commit. A drag that never
    /// moved commits its baseline unchanged.
    pub fn drag_end(&mut self) -> Option<TimeValue> {
        match std::mem::take(&mut self.state) {
            GestureState::Dragging(drag) => {
                log::debug!(
                    "Released {} hand: {} -> {}",
                    drag.hand,
                    drag.baseline,
                    drag.candidate
                );
                Some(drag.candidate)
            }
            GestureState::Idle => None,
        }
    }

    /// Abandons the drag without producing a time.
    pub fn cancel(&mut self) -> Option<Drag> {
        match std::mem::take(&mut self.state) {
            GestureState::Dragging(drag) => {
                log::debug!("Cancelled drag of {} hand", drag.hand);
                Some(drag)
            }
            GestureState::Idle => None,
        }
    }
}

impl Drag {
    /// Signed rotation from where the touch started to where it is now.
    pub fn swept(&self) -> f64 {
        self.start_angle.signed_delta_to(self.current_angle)
    }

    pub fn pose(&self) -> HandAngles {
        if self.moved {
            angles_for_time(&self.candidate)
        } else {
            self.start_pose
        }
    }
}

impl HitArea {
    pub fn hand_tip(&self, hand: Hand, time: &TimeValue) -> Point {
        self.center
            .polar_offset(self.reach.get(hand), angles_for_time(time).get(hand))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;
    const AREA: HitArea = HitArea {
        center: Point { x: 100.0, y: 100.0 },
        reach: HandReach {
            hour: 50.0,
            minute: 80.0,
        },
        tolerance: 12.0,
    };

    fn at(angle: f64, distance: f64) -> Point {
        AREA.center.polar_offset(distance, Degrees(angle))
    }

    fn grab(controller: &mut GestureController, time: TimeValue, hand: Hand) {
        let tip = AREA.hand_tip(hand, &time);
        let grip = Point::new(
            AREA.center.x + (tip.x - AREA.center.x) * 0.9,
            AREA.center.y + (tip.y - AREA.center.y) * 0.9,
        );
        assert_eq!(
            controller.drag_start(grip, time, angles_for_time(&time), &AREA),
            Some(hand)
        );
    }

    #[test]
    fn test_drag_on_empty_face_is_ignored() {
        let mut controller = GestureController::new(true);
        let time = TimeValue::new(3, 0);
        let pose = angles_for_time(&time);
        assert_eq!(controller.drag_start(at(200.0, 60.0), time, pose, &AREA), None);
        assert!(!controller.is_dragging());
        assert_eq!(controller.drag_move(at(250.0, 60.0), &AREA), None);
        assert_eq!(controller.drag_end(), None);
    }

    #[test]
    fn test_snapping_minute_drag_lands_on_whole_minute() {
        let mut controller = GestureController::new(true);
        grab(&mut controller, TimeValue::new(3, 30), Hand::Minute);

        let candidate = controller.drag_move(at(182.0, 70.0), &AREA).unwrap();
        assert_eq!((candidate.hour(), candidate.exact_minute()), (3, 30.0));
    }

    #[test]
    fn test_smooth_minute_drag_keeps_fraction() {
        let mut controller = GestureController::new(false);
        grab(&mut controller, TimeValue::new(3, 30), Hand::Minute);

        let candidate = controller.drag_move(at(182.0, 70.0), &AREA).unwrap();
        assert_eq!(candidate.hour(), 3);
        assert!((candidate.exact_minute() - (30.0 + 1.0 / 3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_snapped_drag_accumulates_sub_minute_motion() {
        let mut controller = GestureController::new(true);
        grab(&mut controller, TimeValue::new(3, 30), Hand::Minute);

        // each step is under half a minute, but together they pass one
        controller.drag_move(at(182.0, 70.0), &AREA);
        let candidate = controller.drag_move(at(184.0, 70.0), &AREA).unwrap();
        assert_eq!(candidate.minute(), 31);
    }

    #[test]
    fn test_minute_drag_across_twelve_advances_hour() {
        let mut controller = GestureController::new(true);
        grab(&mut controller, TimeValue::new(3, 58), Hand::Minute);

        controller.drag_move(at(354.0, 70.0), &AREA);
        let candidate = controller.drag_move(at(6.0, 70.0), &AREA).unwrap();
        assert_eq!((candidate.hour(), candidate.minute()), (4, 1));
    }

    #[test]
    fn test_minute_drag_backwards_across_twelve_rewinds_hour_and_day() {
        let mut controller = GestureController::new(true);
        grab(&mut controller, TimeValue::new(0, 2), Hand::Minute);

        controller.drag_move(at(6.0, 70.0), &AREA);
        let candidate = controller.drag_move(at(348.0, 70.0), &AREA).unwrap();
        assert_eq!((candidate.hour(), candidate.minute()), (23, 58));
    }

    #[test]
    fn test_hour_drag_keeps_minute() {
        let mut controller = GestureController::new(true);
        grab(&mut controller, TimeValue::new(3, 20), Hand::Hour);

        let candidate = controller.drag_move(at(185.0, 40.0), &AREA).unwrap();
        assert_eq!((candidate.hour(), candidate.minute()), (6, 20));
    }

    #[test]
    fn test_hour_drag_past_twelve_switches_to_pm() {
        let mut controller = GestureController::new(true);
        grab(&mut controller, TimeValue::new(10, 0), Hand::Hour);

        controller.drag_move(at(335.0, 40.0), &AREA);
        let candidate = controller.drag_move(at(15.0, 40.0), &AREA).unwrap();
        assert_eq!(candidate.hour(), 12);
        assert!(!candidate.is_am());
    }

    #[test]
    fn test_grabbed_hand_never_changes() {
        let mut controller = GestureController::new(true);
        grab(&mut controller, TimeValue::new(3, 0), Hand::Hour);

        // pass straight over the minute hand at 12
        controller.drag_move(at(0.5, 70.0), &AREA);
        assert_eq!(controller.active_hand(), Some(Hand::Hour));
        let committed = controller.drag_end().unwrap();
        assert_eq!(committed.minute(), 0);
    }

    #[test]
    fn test_drag_without_movement_commits_baseline() {
        let mut controller = GestureController::new(true);
        let time = TimeValue::new(8, 45);
        grab(&mut controller, time, Hand::Minute);

        assert_eq!(controller.drag_move(at(90.0, 5.0), &AREA), None);
        assert_eq!(controller.drag_end(), Some(time));
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_cancel_drops_candidate() {
        let mut controller = GestureController::new(true);
        grab(&mut controller, TimeValue::new(8, 45), Hand::Minute);
        controller.drag_move(at(0.0, 70.0), &AREA);

        let drag = controller.cancel().unwrap();
        assert!((drag.swept() - 90.0).abs() < 5.0);
        assert_eq!(controller.drag_end(), None);
    }

    #[test]
    fn test_touch_angle_is_tracked() {
        let mut controller = GestureController::new(false);
        grab(&mut controller, TimeValue::new(0, 15), Hand::Minute);
        controller.drag_move(at(100.0, 70.0), &AREA);

        let GestureState::Dragging(drag) = controller.state() else {
            panic!("expected a drag in progress");
        };
        assert!((drag.current_angle.value() - 100.0).abs() < EPS);
        assert!((drag.swept() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_hit_test_uses_drawn_pose() {
        let mut controller = GestureController::new(true);
        let time = TimeValue::new(3, 0);
        // hands drawn partway to 6:00: hour at 135, minute still at 12
        let pose = HandAngles::new(Degrees(135.0), Degrees(0.0));

        assert_eq!(controller.drag_start(at(90.0, 45.0), time, pose, &AREA), None);
        assert_eq!(
            controller.drag_start(at(135.0, 45.0), time, pose, &AREA),
            Some(Hand::Hour)
        );
    }

    #[test]
    fn test_drawn_pose_is_kept_until_first_move() {
        let mut controller = GestureController::new(true);
        let time = TimeValue::new(4, 0);
        let pose = HandAngles::new(Degrees(105.0), Degrees(0.0));
        controller.drag_start(at(0.0, 70.0), time, pose, &AREA);

        assert_eq!(controller.view(), Some((time, pose)));
        assert_eq!(controller.drag_move(at(90.0, 5.0), &AREA), None);
        assert_eq!(controller.view(), Some((time, pose)));

        let candidate = controller.drag_move(at(6.0, 70.0), &AREA).unwrap();
        assert_eq!(candidate, TimeValue::new(4, 1));
        assert_eq!(controller.view(), Some((candidate, angles_for_time(&candidate))));
    }
}
