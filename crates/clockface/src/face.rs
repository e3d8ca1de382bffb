use crate::angle::{HandAngles, angles_for_time, time_nearest_angles};
use crate::animation::{Frame, TransitionAnimator};
use crate::behavior::Behavior;
use crate::clock::{FrameClock, SystemClock};
use crate::error::ClockError;
use crate::geometry::{FaceGeometry, Point};
use crate::gesture::{GestureController, HitArea};
use crate::render::{FaceRenderer, FaceScene};
use crate::style::ClockStyle;
use crate::time::{TimeValue, ZoneOffset};
use std::time::Duration;

/// What the host should do after feeding the face an event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceAction {
    pub should_redraw: bool,
    /// Set when a drag ends or an animation completes: the new authoritative
    /// time, in the reference zone.
    pub committed: Option<TimeValue>,
}

impl FaceAction {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn redraw() -> Self {
        Self {
            should_redraw: true,
            committed: None,
        }
    }

    pub fn committed(time: TimeValue) -> Self {
        Self {
            should_redraw: true,
            committed: Some(time),
        }
    }
}

/// An interactive analog clock face.
///
/// Owns the authoritative time (in the reference zone), the drag state and
/// the animation state. Setters and [`ClockFace::time`] work in the reference
/// zone. The hands, [`ClockFace::hour`], [`ClockFace::minute`] and
/// [`ClockFace::is_am`] show that time shifted by the configured offset.
/// Intermediate drag and animation values are only ever visible through
/// [`ClockFace::view`] and the scene handed to the renderer.
pub struct ClockFace<C: FrameClock = SystemClock> {
    time: TimeValue,
    pending: Option<TimeValue>,
    // target of an animation a drag grabbed, resumed if the drag is cancelled
    interrupted: Option<TimeValue>,
    style: ClockStyle,
    behavior: Behavior,
    animation_duration: Duration,
    geometry: FaceGeometry,
    gesture: GestureController,
    animator: TransitionAnimator,
    clock: C,
}

impl ClockFace<SystemClock> {
    pub fn new(style: ClockStyle, behavior: Behavior) -> Result<Self, ClockError> {
        Self::with_clock(style, behavior, SystemClock)
    }
}

impl<C: FrameClock> ClockFace<C> {
    pub fn with_clock(style: ClockStyle, behavior: Behavior, clock: C) -> Result<Self, ClockError> {
        style.validate()?;
        behavior.validate()?;
        let animation_duration = behavior.animation_duration()?;

        Ok(Self {
            time: TimeValue::MIDNIGHT,
            pending: None,
            interrupted: None,
            gesture: GestureController::new(!behavior.minute_hand_moves_smoothly),
            animator: TransitionAnimator::new(),
            geometry: FaceGeometry::default(),
            animation_duration,
            style,
            behavior,
            clock,
        })
    }

    /// Replaces style and behaviour. Nothing changes if either is invalid.
    pub fn apply_config(
        &mut self,
        style: ClockStyle,
        behavior: Behavior,
    ) -> Result<FaceAction, ClockError> {
        style.validate()?;
        behavior.validate()?;
        let animation_duration = behavior.animation_duration()?;

        if behavior.utc_offset_seconds != self.offset() {
            self.settle();
        }
        self.gesture.set_snap_to_minute(!behavior.minute_hand_moves_smoothly);
        self.animation_duration = animation_duration;
        self.style = style;
        self.behavior = behavior;
        Ok(FaceAction::redraw())
    }

    pub fn style(&self) -> &ClockStyle {
        &self.style
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn geometry(&self) -> FaceGeometry {
        self.geometry
    }

    pub fn set_geometry(&mut self, geometry: FaceGeometry) {
        self.geometry = geometry;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.geometry = FaceGeometry::from_bounds(width, height);
    }

    /// The committed time in the reference zone.
    pub fn time(&self) -> TimeValue {
        self.time
    }

    /// Hour the hands show, in the displayed zone.
    pub fn hour(&self) -> u8 {
        self.displayed_time().hour()
    }

    pub fn minute(&self) -> u8 {
        self.displayed_time().minute()
    }

    pub fn offset(&self) -> ZoneOffset {
        self.behavior.utc_offset_seconds
    }

    pub fn hour_offset(&self) -> i32 {
        self.offset().hours()
    }

    pub fn minute_offset(&self) -> i32 {
        self.offset().minutes()
    }

    /// The committed time as the hands show it.
    pub fn displayed_time(&self) -> TimeValue {
        self.time.offset_by(self.offset())
    }

    pub fn is_am(&self) -> bool {
        self.displayed_time().is_am()
    }

    /// Changing the offset finishes any animation and drops any drag first.
    pub fn set_offset(&mut self, offset: ZoneOffset) -> FaceAction {
        self.settle();
        self.behavior.utc_offset_seconds = offset;
        FaceAction::redraw()
    }

    pub fn minute_hand_moves_smoothly(&self) -> bool {
        self.behavior.minute_hand_moves_smoothly
    }

    pub fn set_minute_hand_moves_smoothly(&mut self, smooth: bool) {
        self.behavior.minute_hand_moves_smoothly = smooth;
        self.gesture.set_snap_to_minute(!smooth);
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    /// What the hands show right now, in the displayed zone: the drag
    /// candidate, the last animation frame, or the committed time.
    pub fn view(&self) -> (TimeValue, HandAngles) {
        if let Some(current) = self.gesture.view() {
            return current;
        }
        if let Some(current) = self.animator.current() {
            return current;
        }
        let displayed = self.displayed_time();
        (displayed, angles_for_time(&displayed))
    }

    pub fn scene(&self) -> FaceScene<'_> {
        let (time, pose) = self.view();
        FaceScene::new(self.geometry, &self.style, pose, time)
    }

    pub fn draw<R: FaceRenderer>(&self, renderer: &mut R) -> Result<(), R::Error> {
        renderer.render(&self.scene())
    }

    /// Where the face is heading: the target of the animation in flight, or
    /// the committed time.
    pub fn target_time(&self) -> TimeValue {
        self.pending.or(self.interrupted).unwrap_or(self.time)
    }

    pub fn set_time(&mut self, hour: i64, minute: i64, animated: bool) -> FaceAction {
        self.change_time(TimeValue::new(hour, minute), animated)
    }

    /// Keeps the minute of the time currently being set.
    pub fn set_hour(&mut self, hour: i64, animated: bool) -> FaceAction {
        let target = self.target_time().with_hour(hour);
        self.change_time(target, animated)
    }

    /// Keeps the hour of the time currently being set. Minutes outside
    /// `[0, 59]` carry into the hour.
    pub fn set_minute(&mut self, minute: i64, animated: bool) -> FaceAction {
        let target = self.target_time().with_minute(minute);
        self.change_time(target, animated)
    }

    pub fn set_time_value(&mut self, time: TimeValue, animated: bool) -> FaceAction {
        self.change_time(time, animated)
    }

    /// Animates to `target` over `duration`, superseding any drag or
    /// animation in progress. The hands start from wherever they are shown.
    pub fn animate_to(&mut self, target: TimeValue, duration: Duration) -> FaceAction {
        if duration.is_zero() {
            return self.commit_now(target);
        }
        let (from, pose) = self.view();
        self.gesture.cancel();
        self.interrupted = None;
        self.animator.start_from(
            from,
            pose,
            target.offset_by(self.offset()),
            duration,
            self.behavior.easing,
            self.clock.now(),
        );
        self.pending = Some(target);
        FaceAction::redraw()
    }

    /// Advances the animation, if any. Call once per display frame.
    pub fn tick(&mut self) -> FaceAction {
        match self.animator.tick(self.clock.now()) {
            None => FaceAction::none(),
            Some(Frame::Running { .. }) => FaceAction::redraw(),
            Some(Frame::Finished(_)) => {
                let target = self.pending.take().unwrap_or(self.time);
                self.time = target;
                log::debug!("Committed {} after animation", target);
                FaceAction::committed(target)
            }
        }
    }

    /// Starts a drag at `point`. Does nothing unless `point` is on a hand as
    /// currently drawn.
    ///
    /// An animation in flight is paused where it is. The hands stay put until
    /// the first move, which builds on the real time closest to them.
    pub fn drag_begin(&mut self, point: Point) -> FaceAction {
        let (time, pose) = self.view();
        let baseline = if self.is_animating() {
            time_nearest_angles(pose.hour, pose.minute, &time)
        } else {
            time
        };
        let area = self.hit_area();
        if self.gesture.drag_start(point, baseline, pose, &area).is_some()
            && self.animator.cancel().is_some()
        {
            self.interrupted = self.pending.take();
        }
        FaceAction::none()
    }

    pub fn drag_update(&mut self, point: Point) -> FaceAction {
        let area = self.hit_area();
        match self.gesture.drag_move(point, &area) {
            Some(_) => FaceAction::redraw(),
            None => FaceAction::none(),
        }
    }

    pub fn drag_end(&mut self) -> FaceAction {
        let Some(displayed) = self.gesture.drag_end() else {
            return FaceAction::none();
        };
        self.interrupted = None;
        self.time = displayed.offset_back(self.offset());
        log::debug!("Committed {} after drag", self.time);
        FaceAction::committed(self.time)
    }

    /// Drops the drag in progress and puts the hands back. If the drag
    /// interrupted an animation, the hands head for its target again.
    pub fn drag_cancel(&mut self) -> FaceAction {
        let Some(drag) = self.gesture.cancel() else {
            return FaceAction::none();
        };
        let Some(target) = self.interrupted.take() else {
            return FaceAction::redraw();
        };
        if self.animation_duration.is_zero() {
            return self.commit_now(target);
        }
        log::debug!("Drag cancelled, resuming animation to {}", target);
        self.animator.start_from(
            drag.candidate,
            drag.pose(),
            target.offset_by(self.offset()),
            self.animation_duration,
            self.behavior.easing,
            self.clock.now(),
        );
        self.pending = Some(target);
        FaceAction::redraw()
    }

    fn hit_area(&self) -> HitArea {
        let radius = self.geometry.radius;
        HitArea {
            center: self.geometry.center,
            reach: self.style.hand_reach(radius),
            tolerance: self.behavior.hit_tolerance * radius,
        }
    }

    fn change_time(&mut self, target: TimeValue, animated: bool) -> FaceAction {
        if animated {
            self.animate_to(target, self.animation_duration)
        } else {
            self.commit_now(target)
        }
    }

    fn commit_now(&mut self, target: TimeValue) -> FaceAction {
        self.gesture.cancel();
        self.animator.cancel();
        self.pending = None;
        self.interrupted = None;
        self.time = target;
        FaceAction::redraw()
    }

    /// Lands any animation on its target and drops any drag.
    fn settle(&mut self) {
        self.gesture.cancel();
        if self.animator.cancel().is_some() {
            self.time = self.pending.take().unwrap_or(self.time);
        }
        if let Some(target) = self.interrupted.take() {
            self.time = target;
        }
    }
}
