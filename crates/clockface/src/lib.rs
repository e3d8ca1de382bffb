//! An interactive analog clock face.
//!
//! The crate holds everything about the clock that does not need a toolkit:
//! the time and angle model, touch-driven editing of either hand, eased
//! transitions between times and the drawable scene. A host feeds it pointer
//! events, frame ticks and a size, and draws whatever [`FaceScene`] says
//! through a [`FaceRenderer`].
//!
//! ```
//! use clockface::{Behavior, ClockFace, ClockStyle};
//!
//! let mut face = ClockFace::new(ClockStyle::default(), Behavior::default()).unwrap();
//! face.set_time(14, 75, false);
//! assert_eq!((face.hour(), face.minute()), (15, 15));
//! assert!(!face.is_am());
//! ```

pub mod angle;
pub mod animation;
pub mod behavior;
pub mod clock;
pub mod error;
pub mod face;
pub mod geometry;
pub mod gesture;
pub mod render;
pub mod style;
pub mod time;

pub use angle::{
    Hand, HandAngles, angles_for_time, time_for_angles, time_nearest_angles, touch_to_angle,
};
pub use animation::{Easing, Frame, TransitionAnimator};
pub use behavior::Behavior;
pub use clock::{FrameClock, ManualClock, SystemClock};
pub use error::ClockError;
pub use face::{ClockFace, FaceAction};
pub use geometry::{Degrees, FaceGeometry, Point};
pub use gesture::{GestureController, GestureState};
pub use render::{FaceRenderer, FaceScene};
pub use style::{ClockStyle, Color, TextAttributes};
pub use time::{TimeValue, ZoneOffset};
