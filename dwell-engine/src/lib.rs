// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

#![doc(test(attr(warn(unused))))]

//! `dwell` - cooperative waits for frame-driven applications
//!
//! This library provides a [`Scheduler`](crate::scheduler::Scheduler) that is
//! ticked once per frame by the host, and a family of
//! [wait primitives](crate::waits) that run on it. A wait polls a condition
//! (every interval, or every tick) and, once the condition holds, runs an
//! optional completion callback and terminates.
//!
//! Waits are explicit state machines implementing
//! [`WaitTask`](crate::task::WaitTask): each step returns a
//! [`Resume`](crate::task::Resume) telling the scheduler whether to sleep for a
//! time, wait for the next tick, or drop the task.
//!
//! # Simple Application
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use dwell_engine::scheduler::Scheduler;
//! use dwell_engine::waits::delay::WaitThen;
//! use dwell_engine::waits::until::WaitUntil;
//!
//! let scheduler = Scheduler::default();
//! let ready = Rc::new(Cell::new(false));
//!
//! {
//!     let ready = ready.clone();
//!     scheduler.spawn(WaitThen::new(0.5).then(move || {
//!         ready.set(true);
//!         Ok(())
//!     }));
//! }
//!
//! let done = Rc::new(Cell::new(false));
//! {
//!     let done = done.clone();
//!     let ready = ready.clone();
//!     scheduler.spawn(WaitUntil::new(move || ready.get(), 0.1).then(move || {
//!         done.set(true);
//!         Ok(())
//!     }));
//! }
//!
//! scheduler.run_until_idle().unwrap();
//! assert!(done.get());
//! ```
//!
//! Completion callbacks return [`WaitResult`](crate::types::WaitResult) so they
//! can raise [`dwell_events`] events with `?`.
//!
//! Cancellation is cooperative: [`TaskHandle::cancel`](crate::task::TaskHandle)
//! marks the task and the scheduler drops it at its next suspension point
//! without running its callback.

pub mod config;
pub mod scheduler;
pub mod task;
pub mod test_helpers;
pub mod time;
pub mod types;
pub mod waits;
