// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A read-only view of the listeners registered with an
//! [`EventBus`](crate::bus::EventBus).
//!
//! The view is live: it reads the bus's own listener list every time it is
//! queried, so listeners added or removed after the view was created are
//! visible through it. Use [`ListenersView::to_vec`] to take a snapshot.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::listener::Listener;

pub struct ListenersView<T> {
    listeners: Rc<RefCell<Vec<Listener<T>>>>,
}

impl<T> ListenersView<T> {
    pub(crate) fn new(listeners: Rc<RefCell<Vec<Listener<T>>>>) -> Self {
        Self { listeners }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Return the listener at `index` in dispatch order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Listener<T>> {
        self.listeners.borrow().get(index).cloned()
    }

    #[must_use]
    pub fn contains(&self, listener: &Listener<T>) -> bool {
        self.listeners.borrow().contains(listener)
    }

    /// Index of the first occurrence of `listener`.
    #[must_use]
    pub fn position(&self, listener: &Listener<T>) -> Option<usize> {
        self.listeners.borrow().iter().position(|l| l == listener)
    }

    /// Number of times `listener` is registered.
    #[must_use]
    pub fn count(&self, listener: &Listener<T>) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| *l == listener)
            .count()
    }

    /// Snapshot of the current listeners in dispatch order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Listener<T>> {
        self.listeners.borrow().clone()
    }
}

impl<T> Clone for ListenersView<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<T> fmt::Debug for ListenersView<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.listeners.borrow().iter()).finish()
    }
}
