//! Animated transitions between two clock times.
//!
//! Each hand rotates along its own shortest arc, so no hand ever travels more
//! than half a turn. The animator owns at most one run. Progress only moves
//! when the host calls [`TransitionAnimator::tick`] from its frame callback,
//! and a superseded run simply stops being ticked, so it cannot emit stale
//! frames.

use crate::angle::{HandAngles, angles_for_time, time_for_angles};
use crate::error::ClockError;
use crate::time::TimeValue;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::time::{Duration, Instant};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum Easing {
    #[default]
    #[strum(to_string = "linear")]
    Linear,
    #[strum(to_string = "ease-in", serialize = "ease_in", serialize = "easein")]
    EaseIn,
    #[strum(to_string = "ease-out", serialize = "ease_out", serialize = "easeout")]
    EaseOut,
    #[strum(
        to_string = "ease-in-out",
        serialize = "ease_in_out",
        serialize = "easeinout"
    )]
    EaseInOut,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` onto the curve. Endpoints are fixed.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

/// Converts a configured duration, rejecting negative and non-finite values.
pub fn duration_from_millis(millis: f64) -> Result<Duration, ClockError> {
    if !millis.is_finite() || millis < 0.0 {
        return Err(ClockError::InvalidDuration(millis));
    }
    Duration::try_from_secs_f64(millis / 1000.0).map_err(|_| ClockError::InvalidDuration(millis))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    /// An intermediate pose and the time it reads as.
    Running { time: TimeValue, pose: HandAngles },
    /// The run reached its target. Carries the exact target, not an
    /// interpolated value.
    Finished(TimeValue),
}

#[derive(Debug, Clone)]
pub struct AnimationRun {
    from: HandAngles,
    hour_delta: f64,
    minute_delta: f64,
    target: TimeValue,
    started_at: Instant,
    duration: Duration,
    easing: Easing,
    progress: f64,
    last_time: TimeValue,
    last_pose: HandAngles,
}

impl AnimationRun {
    fn new(
        from_time: TimeValue,
        from: HandAngles,
        to: TimeValue,
        duration: Duration,
        easing: Easing,
        now: Instant,
    ) -> Self {
        let target = angles_for_time(&to);
        Self {
            from,
            hour_delta: from.hour.signed_delta_to(target.hour),
            minute_delta: from.minute.signed_delta_to(target.minute),
            target: to,
            started_at: now,
            duration,
            easing,
            progress: 0.0,
            last_time: from_time,
            last_pose: from,
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn target(&self) -> TimeValue {
        self.target
    }

    /// Rotation each hand covers over the whole run, in degrees.
    pub fn deltas(&self) -> (f64, f64) {
        (self.hour_delta, self.minute_delta)
    }

    fn pose_at(&self, eased: f64) -> HandAngles {
        HandAngles::new(
            self.from.hour.rotated(self.hour_delta * eased),
            self.from.minute.rotated(self.minute_delta * eased),
        )
    }

    fn advance(&mut self, now: Instant) -> Frame {
        let elapsed = now.saturating_duration_since(self.started_at);
        let linear = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        self.progress = self.progress.max(linear);

        if self.progress >= 1.0 {
            return Frame::Finished(self.target);
        }

        let pose = self.pose_at(self.easing.apply(self.progress));
        let time = time_for_angles(pose.hour, pose.minute, false, &self.last_time);
        self.last_time = time;
        self.last_pose = pose;
        Frame::Running { time, pose }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransitionAnimator {
    run: Option<AnimationRun>,
}

impl TransitionAnimator {
    pub fn new() -> Self {
        Self { run: None }
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn run(&self) -> Option<&AnimationRun> {
        self.run.as_ref()
    }

    /// Last emitted intermediate, or the starting point if no frame was
    /// emitted yet.
    pub fn current(&self) -> Option<(TimeValue, HandAngles)> {
        self.run.as_ref().map(|run| (run.last_time, run.last_pose))
    }

    /// Starts animating from `from` to `to`.
    ///
    /// If a run is already in flight it is abandoned and the new run starts
    /// from its last emitted pose instead of `from`, so the hands never jump.
    pub fn start(
        &mut self,
        from: TimeValue,
        to: TimeValue,
        duration: Duration,
        easing: Easing,
        now: Instant,
    ) {
        let (from_time, from_pose) = match self.cancel() {
            Some(current) => current,
            None => (from, angles_for_time(&from)),
        };
        self.start_from(from_time, from_pose, to, duration, easing, now);
    }

    /// Starts animating to `to` with the hands at `from_pose`, which need not
    /// match `from_time`. Any run in flight is replaced.
    pub fn start_from(
        &mut self,
        from_time: TimeValue,
        from_pose: HandAngles,
        to: TimeValue,
        duration: Duration,
        easing: Easing,
        now: Instant,
    ) {
        let run = AnimationRun::new(from_time, from_pose, to, duration, easing, now);
        log::debug!(
            "Animating {} -> {} over {:?} ({:+.1}°/{:+.1}°)",
            from_time,
            to,
            duration,
            run.hour_delta,
            run.minute_delta
        );
        self.run = Some(run);
    }

    /// Advances the run to `now`. Returns `None` when nothing is animating.
    pub fn tick(&mut self, now: Instant) -> Option<Frame> {
        let frame = self.run.as_mut()?.advance(now);
        match frame {
            Frame::Finished(target) => {
                log::debug!("Animation to {} complete", target);
                self.run = None;
            }
            Frame::Running { time, .. } => log::trace!("Animation frame at {}", time),
        }
        Some(frame)
    }

    /// Abandons the run in flight and returns where it had got to.
    pub fn cancel(&mut self) -> Option<(TimeValue, HandAngles)> {
        let run = self.run.take()?;
        log::debug!(
            "Cancelled animation to {} at {:.0}%",
            run.target,
            run.progress * 100.0
        );
        Some((run.last_time, run.last_pose))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Degrees;

    const EPS: f64 = 1e-9;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn running(frame: Option<Frame>) -> (TimeValue, HandAngles) {
        match frame {
            Some(Frame::Running { time, pose }) => (time, pose),
            other => panic!("expected a running frame, got {other:?}"),
        }
    }

    #[test]
    fn test_short_path_through_twelve() {
        // minute hand 350 -> 10 must go forward 20 degrees
        let t0 = Instant::now();
        let mut animator = TransitionAnimator::new();
        let from = TimeValue::with_fraction(2, 350.0 / 6.0);
        let to = TimeValue::with_fraction(3, 10.0 / 6.0);
        animator.start(from, to, ms(100), Easing::Linear, t0);

        let (_, minute_delta) = animator.run().unwrap().deltas();
        assert!((minute_delta - 20.0).abs() < 1e-6);

        let (_, pose) = running(animator.tick(t0 + ms(50)));
        assert!(pose.minute.distance_to(Degrees(0.0)) < 1e-6);
    }

    #[test]
    fn test_short_path_backwards_through_twelve() {
        let t0 = Instant::now();
        let mut animator = TransitionAnimator::new();
        let from = TimeValue::with_fraction(3, 10.0 / 6.0);
        let to = TimeValue::with_fraction(2, 350.0 / 6.0);
        animator.start(from, to, ms(100), Easing::Linear, t0);

        let (_, minute_delta) = animator.run().unwrap().deltas();
        assert!((minute_delta + 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_hand_travels_more_than_half_a_turn() {
        let t0 = Instant::now();
        for (from, to) in [((3, 0), (9, 30)), ((0, 0), (11, 59)), ((6, 15), (6, 45))] {
            let mut animator = TransitionAnimator::new();
            animator.start(
                TimeValue::new(from.0, from.1),
                TimeValue::new(to.0, to.1),
                ms(300),
                Easing::Linear,
                t0,
            );
            let (hour, minute) = animator.run().unwrap().deltas();
            assert!(hour.abs() <= 180.0 && minute.abs() <= 180.0);
        }
    }

    #[test]
    fn test_midpoint_across_noon_stays_on_short_arc() {
        let t0 = Instant::now();
        let mut animator = TransitionAnimator::new();
        animator.start(
            TimeValue::new(11, 59),
            TimeValue::new(12, 1),
            ms(300),
            Easing::Linear,
            t0,
        );

        let (time, pose) = running(animator.tick(t0 + ms(150)));
        assert!(pose.hour.distance_to(Degrees(359.5)) <= 0.5 + EPS);
        assert!(pose.hour.distance_to(Degrees(0.5)) <= 0.5 + EPS);
        assert_eq!((time.hour(), time.minute()), (12, 0));
    }

    #[test]
    fn test_completion_commits_exact_target() {
        let t0 = Instant::now();
        let mut animator = TransitionAnimator::new();
        let to = TimeValue::new(7, 13);
        animator.start(TimeValue::new(1, 2), to, ms(300), Easing::EaseInOut, t0);

        running(animator.tick(t0 + ms(100)));
        assert_eq!(animator.tick(t0 + ms(400)), Some(Frame::Finished(to)));
        assert!(!animator.is_running());
        assert_eq!(animator.tick(t0 + ms(500)), None);
    }

    #[test]
    fn test_progress_never_goes_backwards() {
        let t0 = Instant::now();
        let mut animator = TransitionAnimator::new();
        animator.start(TimeValue::new(1, 0), TimeValue::new(1, 30), ms(100), Easing::Linear, t0);

        animator.tick(t0 + ms(60));
        animator.tick(t0 + ms(20));
        assert!((animator.run().unwrap().progress() - 0.6).abs() < EPS);
    }

    #[test]
    fn test_zero_duration_finishes_on_first_tick() {
        let t0 = Instant::now();
        let mut animator = TransitionAnimator::new();
        let to = TimeValue::new(5, 5);
        animator.start(TimeValue::new(1, 0), to, Duration::ZERO, Easing::Linear, t0);
        assert_eq!(animator.tick(t0), Some(Frame::Finished(to)));
    }

    #[test]
    fn test_superseding_run_starts_from_last_frame() {
        let t0 = Instant::now();
        let mut animator = TransitionAnimator::new();
        animator.start(TimeValue::new(3, 0), TimeValue::new(3, 30), ms(100), Easing::Linear, t0);
        let (mid, mid_pose) = running(animator.tick(t0 + ms(50)));
        assert_eq!(mid.minute(), 15);

        animator.start(TimeValue::new(3, 0), TimeValue::new(3, 0), ms(100), Easing::Linear, t0 + ms(50));
        let (time, pose) = running(animator.tick(t0 + ms(50)));
        assert_eq!(pose, mid_pose);
        assert_eq!(time, mid);

        let (_, minute_delta) = animator.run().unwrap().deltas();
        assert!((minute_delta + 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_start_from_uses_given_pose() {
        let t0 = Instant::now();
        let mut animator = TransitionAnimator::new();
        // hands out of step: hour past 3, minute still at 12
        let pose = HandAngles::new(Degrees(105.0), Degrees(0.0));
        let to = TimeValue::new(4, 0);
        animator.start_from(TimeValue::new(3, 0), pose, to, ms(100), Easing::Linear, t0);
        assert_eq!(animator.current(), Some((TimeValue::new(3, 0), pose)));

        let (_, mid) = running(animator.tick(t0 + ms(50)));
        assert!((mid.hour.0 - 112.5).abs() < EPS);
        assert!(mid.minute.0.abs() < EPS);
    }

    #[test]
    fn test_cancel_returns_last_frame() {
        let t0 = Instant::now();
        let mut animator = TransitionAnimator::new();
        animator.start(TimeValue::new(3, 0), TimeValue::new(3, 30), ms(100), Easing::Linear, t0);
        let (mid, _) = running(animator.tick(t0 + ms(50)));

        assert_eq!(animator.cancel().map(|(time, _)| time), Some(mid));
        assert_eq!(animator.tick(t0 + ms(60)), None);
        assert_eq!(animator.cancel(), None);
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < EPS);
        }
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
    }

    #[test]
    fn test_easing_deserialization() {
        let cases = vec![
            ("\"linear\"", Easing::Linear),
            ("\"LINEAR\"", Easing::Linear),
            ("\"ease-in\"", Easing::EaseIn),
            ("\"ease_out\"", Easing::EaseOut),
            ("\"EaseInOut\"", Easing::EaseInOut),
        ];

        for (json, expected) in cases {
            let deserialized: Easing = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert_eq!(serde_json::to_string(&Easing::EaseInOut).unwrap(), "\"ease-in-out\"");
    }

    #[test]
    fn test_duration_from_millis() {
        assert_eq!(duration_from_millis(250.0), Ok(ms(250)));
        assert_eq!(duration_from_millis(0.0), Ok(Duration::ZERO));
        assert_eq!(duration_from_millis(-1.0), Err(ClockError::InvalidDuration(-1.0)));
        assert!(duration_from_millis(f64::INFINITY).is_err());
    }
}
