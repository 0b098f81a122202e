// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A single-threaded event that can be invoked any number of times.
//!
//! Clones of an [`EventBus`] share the same listener list, which allows a
//! listener to capture the bus it is registered with (for example to remove
//! itself).
//!
//! [`EventBus::invoke`] copies the listener list before calling anything. A
//! listener that adds or removes listeners therefore only changes what later
//! invocations see.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::listener::Listener;
use crate::traits::Subscribe;
use crate::types::EventResult;
use crate::view::ListenersView;

pub struct EventBus<T> {
    listeners: Rc<RefCell<Vec<Listener<T>>>>,
}

impl<T> EventBus<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Create a bus whose listener list starts as a copy of `listeners`.
    #[must_use]
    pub fn with_listeners(listeners: &[Listener<T>]) -> Self {
        Self {
            listeners: Rc::new(RefCell::new(listeners.to_vec())),
        }
    }

    /// Wrap `callback` in a [`Listener`], add it and return the handle needed
    /// to remove it again.
    pub fn add_fn(
        &self,
        callback: impl Fn(&[T]) -> EventResult + 'static,
    ) -> Listener<T> {
        let listener = Listener::new(callback);
        self.add(listener.clone());
        listener
    }

    /// Live, read-only view of the registered listeners.
    #[must_use]
    pub fn listeners(&self) -> ListenersView<T> {
        ListenersView::new(self.listeners.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Call every registered listener, in the order they were added, with
    /// `args`.
    ///
    /// Stops at the first listener that returns an error and returns that
    /// error. Invoking a bus with no listeners does nothing.
    pub fn invoke(&self, args: &[T]) -> EventResult {
        // The borrow must be released before any listener runs so that
        // listeners can change the registry.
        let snapshot = self.listeners.borrow().clone();
        trace!("invoke {} listener(s)", snapshot.len());
        for listener in &snapshot {
            listener.call(args)?;
        }
        Ok(())
    }
}

impl<T> Subscribe<Listener<T>> for EventBus<T> {
    fn add(&self, listener: Listener<T>) {
        self.listeners.borrow_mut().push(listener);
    }

    fn remove(&self, listener: &Listener<T>) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners.iter().position(|l| l == listener) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_listeners_copies_initial_list() {
        let initial = vec![Listener::new(|_: &[u8]| Ok(()))];
        let bus = EventBus::with_listeners(&initial);
        assert_eq!(bus.len(), 1);

        bus.add_fn(|_| Ok(()));
        assert_eq!(bus.len(), 2);
        assert_eq!(initial.len(), 1);
    }

    #[test]
    fn remove_missing_listener_is_noop() {
        let bus: EventBus<u8> = EventBus::new();
        let registered = bus.add_fn(|_| Ok(()));
        let stranger = Listener::new(|_: &[u8]| Ok(()));

        assert!(!bus.remove(&stranger));
        assert_eq!(bus.len(), 1);
        assert!(bus.remove(&registered));
        assert!(bus.is_empty());
        assert!(!bus.remove(&registered));
    }

    #[test]
    fn remove_takes_first_occurrence_only() {
        let bus: EventBus<u8> = EventBus::new();
        let a = Listener::new(|_: &[u8]| Ok(()));
        let b = Listener::new(|_: &[u8]| Ok(()));
        bus.add(a.clone());
        bus.add(b.clone());
        bus.add(a.clone());

        assert!(bus.remove(&a));
        assert_eq!(bus.listeners().to_vec(), vec![b, a]);
    }
}
