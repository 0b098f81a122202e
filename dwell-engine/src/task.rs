// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Resumable tasks.
//!
//! A wait is written as an explicit state machine rather than a coroutine.
//! The [`Scheduler`](crate::scheduler::Scheduler) calls
//! [`WaitTask::step`] whenever the task is due and the task answers with a
//! [`Resume`] saying when it wants to be stepped next.
//!
//! Every task moves through the same states:
//!
//! ```text
//! Running --(exit condition met)--> Satisfied --(callback returned)--> Completed
//! ```
//!
//! `Cancelled` is only ever reached through a [`TaskHandle`]. `Failed` is set
//! by the scheduler when a task asks for a sleep it cannot honour.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::time::clock::{FrameClock, FrameTime};
use crate::types::{WaitError, WaitResult};
use crate::wait_error;

/// What a task wants after a step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resume {
    /// Suspend for at least this many seconds.
    Sleep(f64),

    /// Suspend until the next tick.
    NextTick,

    /// The task has terminated and must not be stepped again.
    Done,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TaskState {
    #[default]
    Running,
    Satisfied,
    Completed,
    Cancelled,
    Failed,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskState::Running => {
                write!(f, "Running")
            }
            TaskState::Satisfied => {
                write!(f, "Satisfied")
            }
            TaskState::Completed => {
                write!(f, "Completed")
            }
            TaskState::Cancelled => {
                write!(f, "Cancelled")
            }
            TaskState::Failed => {
                write!(f, "Failed")
            }
        }
    }
}

/// Read-only view of time passed to [`WaitTask::step`].
pub struct StepContext<'a> {
    clock: &'a FrameClock,
}

impl<'a> StepContext<'a> {
    pub fn new(clock: &'a FrameClock) -> Self {
        Self { clock }
    }

    /// Duration of the current frame in seconds.
    pub fn delta_secs(&self) -> f64 {
        self.clock.delta_secs()
    }

    pub fn now_secs(&self) -> f64 {
        self.clock.now_secs()
    }

    pub fn time_now(&self) -> FrameTime {
        self.clock.time_now()
    }
}

/// The `WaitTask` trait is implemented by everything that can be spawned on a
/// [`Scheduler`](crate::scheduler::Scheduler)
pub trait WaitTask {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    fn state(&self) -> TaskState;

    /// Run the task up to its next suspension point.
    ///
    /// Stepping a task that has already returned [`Resume::Done`] is an error.
    fn step(&mut self, cx: &StepContext) -> Result<Resume, WaitError>;
}

/// Tracks the `Running -> Satisfied -> Completed` progression of a wait and
/// guarantees that the completion callback runs at most once.
#[derive(Debug, Default)]
pub struct Progress {
    state: TaskState,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Fail if the task has already finished.
    pub fn ensure_running(&self, name: &str) -> WaitResult {
        match self.state {
            TaskState::Running => Ok(()),
            _ => wait_error!(format!("{name}: task already completed")),
        }
    }

    /// Mark the task satisfied, run `then` if present and mark it completed.
    ///
    /// If the callback fails the task stays `Satisfied` and the error is
    /// returned.
    pub fn complete<F>(&mut self, then: Option<F>) -> Result<Resume, WaitError>
    where
        F: FnOnce() -> WaitResult,
    {
        self.state = TaskState::Satisfied;
        if let Some(then) = then {
            then()?;
        }
        self.state = TaskState::Completed;
        Ok(Resume::Done)
    }
}

struct HandleState {
    id: u64,
    name: String,
    state: Cell<TaskState>,
    cancel_requested: Cell<bool>,
}

/// A handle to a spawned task.
///
/// The handle reports the task's state and allows it to be cancelled. A
/// cancelled task is dropped at its next suspension point without running its
/// completion callback.
#[derive(Clone)]
pub struct TaskHandle {
    shared_state: Rc<HandleState>,
}

impl TaskHandle {
    pub(crate) fn new(id: u64, name: &str) -> Self {
        Self {
            shared_state: Rc::new(HandleState {
                id,
                name: name.to_string(),
                state: Cell::new(TaskState::Running),
                cancel_requested: Cell::new(false),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.shared_state.id
    }

    pub fn name(&self) -> &str {
        &self.shared_state.name
    }

    pub fn state(&self) -> TaskState {
        self.shared_state.state.get()
    }

    /// Request cancellation. Has no effect on a task that has finished.
    pub fn cancel(&self) {
        if !self.is_finished() {
            self.shared_state.cancel_requested.set(true);
        }
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.shared_state.cancel_requested.get()
    }

    /// True once the task has completed, been cancelled or failed.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.state(),
            TaskState::Completed | TaskState::Cancelled | TaskState::Failed
        )
    }

    pub(crate) fn set_state(&self, state: TaskState) {
        self.shared_state.state.set(state);
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}#{}", self.name(), self.id())
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("state", &self.state())
            .finish()
    }
}
