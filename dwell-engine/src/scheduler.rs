// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Single-threaded, frame-driven scheduler.
//!
//! The host calls [`Scheduler::tick`] once per frame with the frame's
//! duration. Each tick:
//!
//!  1. advances the [`FrameClock`],
//!  2. drops tasks whose [`TaskHandle`] was cancelled,
//!  3. steps every sleeping task whose wake time has been reached (earliest
//!     first), every task waiting for the next tick and every task spawned
//!     since the previous tick, in that order.
//!
//! Only one task is ever stepped at a time. Tasks spawned while a tick is in
//! progress (for example from a completion callback) take their first step on
//! the following tick.
//!
//! This is a thin wrapper (using [`Rc`]) around the real scheduler state, so
//! it can be cloned into callbacks that need to spawn further waits.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, trace, warn};

use crate::config::SchedulerConfig;
use crate::task::{Resume, StepContext, TaskHandle, TaskState, WaitTask};
use crate::time::clock::FrameClock;
use crate::types::{WaitError, WaitResult};
use crate::wait_error;

/// Sleeping tasks wake when within this many seconds of their wake time, so
/// that accumulated frame deltas do not delay a wake by a whole frame.
const WAKE_TOLERANCE_SECS: f64 = 1e-9;

struct Entry {
    task: Box<dyn WaitTask>,
    handle: TaskHandle,
}

struct Sleeper {
    wake_at: f64,
    entry: Entry,
}

struct SchedulerState {
    config: SchedulerConfig,
    clock: FrameClock,

    /// Tasks spawned since the last tick.
    new_tasks: RefCell<Vec<Entry>>,

    /// Tasks waiting for the next tick.
    next_tick: RefCell<Vec<Entry>>,

    /// Tasks waiting for a time. Kept sorted by wake time, ties in the order
    /// they went to sleep.
    sleeping: RefCell<Vec<Sleeper>>,

    next_id: Cell<u64>,
}

#[derive(Clone)]
pub struct Scheduler {
    state: Rc<SchedulerState>,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            state: Rc::new(SchedulerState {
                config,
                clock: FrameClock::new(),
                new_tasks: RefCell::new(Vec::new()),
                next_tick: RefCell::new(Vec::new()),
                sleeping: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Queue `task`; it takes its first step on the next tick.
    pub fn spawn(&self, task: impl WaitTask + 'static) -> TaskHandle {
        let name = task.name().to_string();
        self.spawn_named(&name, task)
    }

    /// Queue `task` under a custom name used in log messages.
    pub fn spawn_named(&self, name: &str, task: impl WaitTask + 'static) -> TaskHandle {
        let id = self.state.next_id.get();
        self.state.next_id.set(id + 1);

        let handle = TaskHandle::new(id, name);
        debug!("{handle}: spawned at {}", self.state.clock.time_now());
        self.state.new_tasks.borrow_mut().push(Entry {
            task: Box::new(task),
            handle: handle.clone(),
        });
        handle
    }

    /// Advance time by one frame of `delta_secs` and step every task that is
    /// due.
    ///
    /// All due tasks are stepped even if one fails; the first error is
    /// returned and the failed task is dropped.
    pub fn tick(&self, delta_secs: f64) -> WaitResult {
        if !(delta_secs >= 0.0 && delta_secs.is_finite()) {
            return wait_error!(format!("invalid frame delta {delta_secs}"));
        }
        self.state.clock.advance(delta_secs);
        self.drop_cancelled();

        let now = self.state.clock.now_secs();
        let mut ready = self.take_due(now);
        ready.append(&mut self.state.next_tick.borrow_mut());
        ready.append(&mut self.state.new_tasks.borrow_mut());

        let mut first_error = None;
        for entry in ready {
            if let Err(e) = self.resume(entry) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Tick `ticks` frames at the configured rate.
    pub fn run_for(&self, ticks: u64) -> WaitResult {
        let delta = self.state.config.tick_delta_secs();
        for _ in 0..ticks {
            self.tick(delta)?;
        }
        Ok(())
    }

    /// Tick at the configured rate until no tasks remain.
    ///
    /// Returns the number of ticks taken, or an error if the configured
    /// `max_ticks` is reached first.
    pub fn run_until_idle(&self) -> Result<u64, WaitError> {
        let delta = self.state.config.tick_delta_secs();
        let max_ticks = self.state.config.max_ticks;
        let mut ticks = 0;
        while !self.is_idle() {
            if ticks >= max_ticks {
                warn!(
                    "stopping after {ticks} ticks with {} task(s) pending",
                    self.pending()
                );
                return wait_error!(format!(
                    "{} task(s) still pending after {ticks} ticks",
                    self.pending()
                ));
            }
            self.tick(delta)?;
            ticks += 1;
        }
        Ok(ticks)
    }

    /// Number of tasks that have not finished.
    pub fn pending(&self) -> usize {
        self.state.new_tasks.borrow().len()
            + self.state.next_tick.borrow().len()
            + self.state.sleeping.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// A clone of the scheduler's clock.
    pub fn clock(&self) -> FrameClock {
        self.state.clock.clone()
    }

    pub fn now_secs(&self) -> f64 {
        self.state.clock.now_secs()
    }

    pub fn frame(&self) -> u64 {
        self.state.clock.frame()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.state.config
    }

    fn resume(&self, mut entry: Entry) -> WaitResult {
        if entry.handle.is_cancel_requested() {
            Self::cancelled(&entry);
            return Ok(());
        }

        let now = self.state.clock.now_secs();
        trace!("{}: resumed at {}", entry.handle, self.state.clock.time_now());
        let cx = StepContext::new(&self.state.clock);
        let result = entry.task.step(&cx);
        entry.handle.set_state(entry.task.state());

        match result {
            Err(e) => {
                debug!("{}: failed: {e}", entry.handle);
                Err(e)
            }
            Ok(Resume::Done) => {
                // A task that returns Done is finished whatever it reports
                if entry.handle.state() == TaskState::Running {
                    entry.handle.set_state(TaskState::Completed);
                }
                debug!("{}: completed at {}", entry.handle, self.state.clock.time_now());
                Ok(())
            }
            Ok(Resume::NextTick) => {
                self.state.next_tick.borrow_mut().push(entry);
                Ok(())
            }
            Ok(Resume::Sleep(secs)) => {
                if !secs.is_finite() {
                    entry.handle.set_state(TaskState::Failed);
                    debug!("{}: failed: invalid sleep of {secs}s", entry.handle);
                    return wait_error!(format!("{}: invalid sleep of {secs}s", entry.handle));
                }
                // A negative sleep wakes on the next tick, like a zero one
                self.schedule(now + secs.max(0.0), entry);
                Ok(())
            }
        }
    }

    fn schedule(&self, wake_at: f64, entry: Entry) {
        let mut sleeping = self.state.sleeping.borrow_mut();
        // Insert after every sleeper due at or before this time
        let index = sleeping.partition_point(|s| s.wake_at <= wake_at);
        sleeping.insert(index, Sleeper { wake_at, entry });
    }

    fn take_due(&self, now: f64) -> Vec<Entry> {
        let mut sleeping = self.state.sleeping.borrow_mut();
        let num_due = sleeping.partition_point(|s| s.wake_at <= now + WAKE_TOLERANCE_SECS);
        sleeping.drain(..num_due).map(|s| s.entry).collect()
    }

    fn drop_cancelled(&self) {
        let keep = |entry: &Entry| {
            if entry.handle.is_cancel_requested() {
                Self::cancelled(entry);
                false
            } else {
                true
            }
        };
        self.state.new_tasks.borrow_mut().retain(keep);
        self.state.next_tick.borrow_mut().retain(keep);
        self.state.sleeping.borrow_mut().retain(|s| keep(&s.entry));
    }

    fn cancelled(entry: &Entry) {
        entry.handle.set_state(TaskState::Cancelled);
        debug!("{}: cancelled", entry.handle);
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Progress;

    /// Sleeps for each of the given durations, recording when it woke.
    struct Sleepy {
        id: u32,
        sleeps: Vec<f64>,
        woken_at: Rc<RefCell<Vec<(u32, f64)>>>,
        progress: Progress,
    }

    impl Sleepy {
        fn new(id: u32, sleeps: Vec<f64>, woken_at: &Rc<RefCell<Vec<(u32, f64)>>>) -> Self {
            Self {
                id,
                sleeps,
                woken_at: woken_at.clone(),
                progress: Progress::new(),
            }
        }
    }

    impl WaitTask for Sleepy {
        fn name(&self) -> &str {
            "sleepy"
        }

        fn state(&self) -> TaskState {
            self.progress.state()
        }

        fn step(&mut self, cx: &StepContext) -> Result<Resume, WaitError> {
            self.progress.ensure_running(self.name())?;
            self.woken_at.borrow_mut().push((self.id, cx.now_secs()));
            match self.sleeps.pop() {
                Some(secs) => Ok(Resume::Sleep(secs)),
                None => self.progress.complete(None::<fn() -> WaitResult>),
            }
        }
    }

    #[test]
    fn sleep_is_a_minimum() {
        let scheduler = Scheduler::default();
        let woken_at = Rc::new(RefCell::new(Vec::new()));
        let handle = scheduler.spawn(Sleepy::new(0, vec![1.0], &woken_at));

        for _ in 0..5 {
            scheduler.tick(0.3).unwrap();
        }

        // First step on the first tick, then woken on the first tick at or
        // after 0.3 + 1.0
        let woken_at = woken_at.borrow();
        assert_eq!(woken_at.len(), 2);
        approx::assert_abs_diff_eq!(woken_at[0].1, 0.3, epsilon = 1e-9);
        approx::assert_abs_diff_eq!(woken_at[1].1, 1.5, epsilon = 1e-9);
        assert_eq!(handle.state(), TaskState::Completed);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn sleepers_wake_in_time_order() {
        let scheduler = Scheduler::default();
        let woken_at = Rc::new(RefCell::new(Vec::new()));
        scheduler.spawn(Sleepy::new(0, vec![3.0], &woken_at));
        scheduler.spawn(Sleepy::new(1, vec![1.0], &woken_at));
        scheduler.spawn(Sleepy::new(2, vec![2.0], &woken_at));
        scheduler.tick(0.0).unwrap();
        assert_eq!(*woken_at.borrow(), vec![(0, 0.0), (1, 0.0), (2, 0.0)]);
        woken_at.borrow_mut().clear();

        scheduler.tick(5.0).unwrap();
        assert_eq!(*woken_at.borrow(), vec![(1, 5.0), (2, 5.0), (0, 5.0)]);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn cancelled_sleeper_is_dropped() {
        let scheduler = Scheduler::default();
        let woken_at = Rc::new(RefCell::new(Vec::new()));
        let handle = scheduler.spawn(Sleepy::new(0, vec![1.0], &woken_at));
        scheduler.tick(0.0).unwrap();
        assert_eq!(scheduler.pending(), 1);

        handle.cancel();
        scheduler.tick(0.5).unwrap();
        assert_eq!(handle.state(), TaskState::Cancelled);
        assert!(scheduler.is_idle());
        assert_eq!(woken_at.borrow().len(), 1);
    }

    #[test]
    fn negative_delta_rejected() {
        let scheduler = Scheduler::default();
        assert!(scheduler.tick(-0.1).is_err());
        assert!(scheduler.tick(f64::NAN).is_err());
        assert_eq!(scheduler.frame(), 0);
    }
}
