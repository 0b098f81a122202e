// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Listener handles.
//!
//! A listener wraps a callback in a reference-counted handle. Clones of a
//! handle refer to the same listener, and two handles compare equal only when
//! they refer to the same callback. Wrapping the same closure twice creates
//! two different listeners.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::types::EventResult;

type Callback<T> = dyn Fn(&[T]) -> EventResult;
type SharedCallback<T> = dyn Fn(&[T]) -> EventResult + Send + Sync;

/// A callback registered with an [`EventBus`](crate::bus::EventBus).
pub struct Listener<T> {
    callback: Rc<Callback<T>>,
}

impl<T> Listener<T> {
    pub fn new(callback: impl Fn(&[T]) -> EventResult + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Call the listener with the event arguments.
    pub fn call(&self, args: &[T]) -> EventResult {
        (self.callback)(args)
    }
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
        }
    }
}

impl<T> PartialEq for Listener<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<T> Eq for Listener<T> {}

impl<T> fmt::Debug for Listener<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.callback))
    }
}

/// A callback registered with a [`SharedEventBus`](crate::shared::SharedEventBus).
///
/// Same identity rules as [`Listener`], but the callback must be `Send + Sync`.
pub struct SharedListener<T> {
    callback: Arc<SharedCallback<T>>,
}

impl<T> SharedListener<T> {
    pub fn new(callback: impl Fn(&[T]) -> EventResult + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Call the listener with the event arguments.
    pub fn call(&self, args: &[T]) -> EventResult {
        (self.callback)(args)
    }
}

impl<T> Clone for SharedListener<T> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
        }
    }
}

impl<T> PartialEq for SharedListener<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<T> Eq for SharedListener<T> {}

impl<T> fmt::Debug for SharedListener<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SharedListener({:p})", Arc::as_ptr(&self.callback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_are_equal() {
        let listener = Listener::new(|_: &[i32]| Ok(()));
        assert_eq!(listener, listener.clone());
    }

    #[test]
    fn same_closure_wrapped_twice_differs() {
        let callback = |_: &[i32]| Ok(());
        let first = Listener::new(callback);
        let second = Listener::new(callback);
        assert_ne!(first, second);
    }

    #[test]
    fn call_passes_arguments() {
        let listener = Listener::new(|args: &[i32]| {
            assert_eq!(args, &[4, 5, 6]);
            Ok(())
        });
        listener.call(&[4, 5, 6]).unwrap();
    }
}
