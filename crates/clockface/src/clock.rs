//! Time sources for driving animations.
//!
//! The face reads the current instant through [`FrameClock`] whenever it
//! starts or advances an animation. Hosts use [`SystemClock`]; tests use
//! [`ManualClock`] to step time explicitly.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub trait FrameClock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl FrameClock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to the face.
///
/// ```
/// use clockface::clock::{FrameClock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::default();
/// let start = clock.now();
/// clock.advance(Duration::from_millis(16));
/// assert_eq!(clock.now(), start + Duration::from_millis(16));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new(start: Instant) -> Self {
        Self {
            current: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.current.set(self.current.get() + by);
    }

    pub fn set(&self, instant: Instant) {
        self.current.set(instant);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> Instant {
        self.current.get()
    }
}
