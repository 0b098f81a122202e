// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! An event bus that can be shared between threads.
//!
//! Behaves like [`EventBus`](crate::bus::EventBus) but keeps its listeners
//! behind a [`Mutex`]. The lock is held while adding or removing a listener and
//! while copying the listener list at the start of an invocation. It is never
//! held while a listener runs, so listeners may call back into the bus.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::trace;

use crate::listener::SharedListener;
use crate::traits::Subscribe;
use crate::types::EventResult;

pub struct SharedEventBus<T> {
    listeners: Arc<Mutex<Vec<SharedListener<T>>>>,
}

impl<T> SharedEventBus<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a bus whose listener list starts as a copy of `listeners`.
    #[must_use]
    pub fn with_listeners(listeners: &[SharedListener<T>]) -> Self {
        Self {
            listeners: Arc::new(Mutex::new(listeners.to_vec())),
        }
    }

    /// Wrap `callback` in a [`SharedListener`], add it and return the handle
    /// needed to remove it again.
    pub fn add_fn(
        &self,
        callback: impl Fn(&[T]) -> EventResult + Send + Sync + 'static,
    ) -> SharedListener<T> {
        let listener = SharedListener::new(callback);
        self.add(listener.clone());
        listener
    }

    /// Snapshot of the registered listeners in dispatch order.
    #[must_use]
    pub fn listeners(&self) -> Vec<SharedListener<T>> {
        self.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Call every registered listener, in the order they were added, with
    /// `args`. Stops at the first error.
    pub fn invoke(&self, args: &[T]) -> EventResult {
        let snapshot = self.lock().clone();
        trace!("invoke {} shared listener(s)", snapshot.len());
        for listener in &snapshot {
            listener.call(args)?;
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SharedListener<T>>> {
        // Listeners never run under the lock, so a poisoned lock still holds
        // a consistent list.
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Subscribe<SharedListener<T>> for SharedEventBus<T> {
    fn add(&self, listener: SharedListener<T>) {
        self.lock().push(listener);
    }

    fn remove(&self, listener: &SharedListener<T>) -> bool {
        let mut listeners = self.lock();
        match listeners.iter().position(|l| l == listener) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }
}

impl<T> Clone for SharedEventBus<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<T> Default for SharedEventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SharedEventBus<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SharedEventBus")
            .field("listeners", &self.len())
            .finish()
    }
}
