// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! This module represents the passing of frames.
//!
//! Time is made up of a frame count and the number of seconds elapsed since
//! the clock was created. Only the [`Scheduler`](crate::scheduler::Scheduler)
//! advances the clock; everything else gets a read-only view.

use std::cell::Cell;
use std::rc::Rc;

/// FrameTime structure for representing a frame number and the time at which
/// it started.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Frames advanced so far.
    frame: u64,

    /// Seconds elapsed since the clock was created.
    secs: f64,
}

impl FrameTime {
    pub fn new(frame: u64, secs: f64) -> Self {
        Self { frame, secs }
    }

    /// Get the frame number.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Get the elapsed seconds.
    pub fn secs(&self) -> f64 {
        self.secs
    }
}

impl std::fmt::Display for FrameTime {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}@{:.3}s", self.frame, self.secs)
    }
}

/// Shared state between a [FrameClock] and its clones.
struct ClockState {
    now: Cell<FrameTime>,

    /// Duration of the last frame in seconds.
    delta_secs: Cell<f64>,
}

#[derive(Clone)]
/// The time source for wait tasks.
///
/// Clones share state, so a clone handed to a collaborator keeps seeing the
/// current frame.
pub struct FrameClock {
    shared_state: Rc<ClockState>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            shared_state: Rc::new(ClockState {
                now: Cell::new(FrameTime::default()),
                delta_secs: Cell::new(0.0),
            }),
        }
    }

    /// Returns the current [FrameTime].
    pub fn time_now(&self) -> FrameTime {
        self.shared_state.now.get()
    }

    /// Returns the seconds elapsed since the clock was created.
    pub fn now_secs(&self) -> f64 {
        self.time_now().secs
    }

    /// Returns the number of frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.time_now().frame
    }

    /// Returns the duration of the last frame in seconds.
    pub fn delta_secs(&self) -> f64 {
        self.shared_state.delta_secs.get()
    }

    /// Start a new frame lasting `delta_secs`.
    pub(crate) fn advance(&self, delta_secs: f64) {
        assert!(delta_secs >= 0.0, "Time moving backwards");
        let now = self.time_now();
        self.shared_state
            .now
            .set(FrameTime::new(now.frame + 1, now.secs + delta_secs));
        self.shared_state.delta_secs.set(delta_secs);
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.delta_secs(), 0.0);

        clock.advance(0.5);
        clock.advance(0.25);
        assert_eq!(clock.frame(), 2);
        assert_eq!(clock.now_secs(), 0.75);
        assert_eq!(clock.delta_secs(), 0.25);
    }

    #[test]
    fn clones_share_time() {
        let clock = FrameClock::new();
        let view = clock.clone();
        clock.advance(1.0);
        assert_eq!(view.time_now(), FrameTime::new(1, 1.0));
        assert_eq!(format!("{}", view.time_now()), "1@1.000s");
    }

    #[test]
    #[should_panic(expected = "Time moving backwards")]
    fn negative_delta_panics() {
        FrameClock::new().advance(-1.0);
    }
}
