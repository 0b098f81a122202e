// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

#![doc(test(attr(warn(unused))))]

//! Ordered multicast events.
//!
//! An [`EventBus`](crate::bus::EventBus) holds an ordered list of
//! [`Listener`](crate::listener::Listener)s. Calling
//! [`invoke`](crate::bus::EventBus::invoke) calls every listener, in the order
//! they were added, with the same arguments.
//!
//! Listeners are added and removed through the
//! [`Subscribe`](crate::traits::Subscribe) trait. A listener is identified by
//! its handle, so the handle returned when adding a closure is what has to be
//! passed back in order to remove it.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use dwell_events::bus::EventBus;
//! use dwell_events::traits::Subscribe;
//!
//! let bus = EventBus::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let listener = {
//!     let seen = seen.clone();
//!     bus.add_fn(move |args: &[u32]| {
//!         seen.borrow_mut().extend_from_slice(args);
//!         Ok(())
//!     })
//! };
//!
//! bus.invoke(&[1, 2]).unwrap();
//! bus.remove(&listener);
//! bus.invoke(&[3]).unwrap();
//!
//! assert_eq!(*seen.borrow(), vec![1, 2]);
//! ```
//!
//! # Dispatch semantics
//!
//! - A listener that returns an error stops the dispatch: later listeners are
//!   not called for that invocation and the error is returned to the caller.
//! - Listeners may add or remove listeners (including themselves) while being
//!   invoked. The invocation in progress works from a copy of the listener
//!   list taken when it started, so such changes only apply to later
//!   invocations.
//!
//! [`EventBus`](crate::bus::EventBus) is single-threaded. Use
//! [`SharedEventBus`](crate::shared::SharedEventBus) when listeners are added,
//! removed or invoked from more than one thread.

pub mod bus;
pub mod listener;
pub mod shared;
pub mod traits;
pub mod types;
pub mod view;
