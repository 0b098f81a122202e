// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Shared types.

use std::error::Error;
use std::fmt;

use dwell_events::types::EventError;

// Wait errors

#[macro_export]
/// Build a [WaitError] from a message that supports `to_string`
macro_rules! wait_error {
    ($msg:expr) => {
        Err($crate::types::WaitError($msg.to_string()))
    };
}

/// The `WaitError` is what should be returned in the case of an error
#[derive(Debug, Clone, PartialEq)]
pub struct WaitError(pub String);

impl fmt::Display for WaitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {}", self.0)
    }
}

impl Error for WaitError {}

/// Allow completion callbacks to raise events with `?`.
impl From<EventError> for WaitError {
    fn from(e: EventError) -> Self {
        WaitError(e.0)
    }
}

/// The WaitResult is the return type for completion callbacks and scheduling
pub type WaitResult = Result<(), WaitError>;

/// A predicate sampled by a wait.
pub type Predicate = Box<dyn FnMut() -> bool>;

/// A completion callback without a payload.
pub type Then = Box<dyn FnOnce() -> WaitResult>;

/// A completion callback that receives the value the wait produced.
pub type ThenWith<T> = Box<dyn FnOnce(T) -> WaitResult>;
