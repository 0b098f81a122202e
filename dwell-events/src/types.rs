// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Shared types.

use std::error::Error;
use std::fmt;

#[macro_export]
/// Build an [EventError] from a message that supports `to_string`
macro_rules! event_error {
    ($msg:expr) => {
        Err($crate::types::EventError($msg.to_string()))
    };
}

/// The `EventError` is what a listener should return when it fails
#[derive(Debug, Clone, PartialEq)]
pub struct EventError(pub String);

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {}", self.0)
    }
}

impl Error for EventError {}

/// The EventResult is the return type of listeners and of dispatch
pub type EventResult = Result<(), EventError>;
