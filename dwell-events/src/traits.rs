// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Traits shared by the event buses.

/// The `Subscribe` trait defines how listeners join and leave an event
///
/// Implementors keep listeners in the order they were added and allow the
/// same listener to be added more than once.
///
/// ```rust
/// pub trait Subscribe<L> {
///     fn add(&self, listener: L);
///     fn remove(&self, listener: &L) -> bool;
/// }
/// ```
pub trait Subscribe<L> {
    /// Append `listener` to the end of the listener list.
    fn add(&self, listener: L);

    /// Remove the first occurrence of `listener`.
    ///
    /// Returns whether a listener was removed. Removing a listener that is not
    /// registered does nothing.
    fn remove(&self, listener: &L) -> bool;
}
