// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The family of wait primitives.
//!
//! Each primitive is a [`WaitTask`](crate::task::WaitTask) that polls some
//! condition and, once it holds, runs an optional completion callback and
//! terminates.
//!
//! | primitive | resumes | exits when |
//! |-----------|---------|------------|
//! | [`WaitThen`](delay::WaitThen) | after a fixed delay | always |
//! | [`WaitUntil`](until::WaitUntil) | every interval | the predicate is true |
//! | [`WaitFirstOf`](first_of::WaitFirstOf) | every interval | any predicate is true, lowest index wins |
//! | [`WaitThenAdvanced`](advanced::WaitThenAdvanced) | every interval | exit-early is true, or the duration has passed and the post-check is true |
//! | [`WaitMeanwhile`](meanwhile::WaitMeanwhile) | every tick | the predicate, given the frame delta, is true |
//! | [`WaitForObject`](find::WaitForObject) | every interval | the lookup finds something |
//! | [`LoadGate`](load::LoadGate) | every interval | the load reports done |
//!
//! Predicates are only sampled when the task is stepped, so a predicate with
//! side effects sees at most one call per poll.

pub mod advanced;
pub mod delay;
pub mod find;
pub mod first_of;
pub mod load;
pub mod meanwhile;
pub mod until;
