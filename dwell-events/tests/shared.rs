// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use dwell_events::event_error;
use dwell_events::listener::SharedListener;
use dwell_events::shared::SharedEventBus;
use dwell_events::traits::Subscribe;

#[test]
fn invoke_in_registration_order() {
    let bus: SharedEventBus<u32> = SharedEventBus::new();
    let calls = Arc::new(Mutex::new(Vec::new()));

    for name in ["l1", "l2", "l3"] {
        let calls = calls.clone();
        bus.add_fn(move |args| {
            calls.lock().unwrap().push((name, args.to_vec()));
            Ok(())
        });
    }

    bus.invoke(&[4]).unwrap();
    assert_eq!(
        *calls.lock().unwrap(),
        vec![("l1", vec![4]), ("l2", vec![4]), ("l3", vec![4])]
    );
}

#[test]
fn error_stops_dispatch() {
    let bus: SharedEventBus<u32> = SharedEventBus::new();
    let count = Arc::new(AtomicUsize::new(0));

    bus.add_fn(|_| event_error!("first listener failed"));
    {
        let count = count.clone();
        bus.add_fn(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
    }

    assert!(bus.invoke(&[]).is_err());
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn self_removal_during_invoke() {
    let bus: SharedEventBus<u32> = SharedEventBus::new();
    let count = Arc::new(AtomicUsize::new(0));

    let me: Arc<Mutex<Option<SharedListener<u32>>>> = Arc::new(Mutex::new(None));
    let listener = {
        let bus = bus.clone();
        let count = count.clone();
        let me = me.clone();
        SharedListener::new(move |_: &[u32]| {
            count.fetch_add(1, Ordering::SeqCst);
            if let Some(me) = me.lock().unwrap().take() {
                bus.remove(&me);
            }
            Ok(())
        })
    };
    *me.lock().unwrap() = Some(listener.clone());
    bus.add(listener);

    bus.invoke(&[]).unwrap();
    bus.invoke(&[]).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(bus.is_empty());
}

#[test]
fn add_and_invoke_from_many_threads() {
    let bus: SharedEventBus<u32> = SharedEventBus::new();
    let total = Arc::new(AtomicUsize::new(0));

    let num_threads = 8;
    let handles = (0..num_threads)
        .map(|_| {
            let bus = bus.clone();
            let total = total.clone();
            thread::spawn(move || {
                bus.add_fn(move |args| {
                    total.fetch_add(args.len(), Ordering::SeqCst);
                    Ok(())
                });
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(bus.len(), num_threads);

    let invokers = (0..num_threads)
        .map(|_| {
            let bus = bus.clone();
            thread::spawn(move || bus.invoke(&[1, 2]))
        })
        .collect::<Vec<_>>();
    for invoker in invokers {
        invoker.join().unwrap().unwrap();
    }

    assert_eq!(
        total.load(Ordering::SeqCst),
        num_threads * num_threads * 2
    );
}

#[test]
fn with_listeners_copies_initial_list() {
    let initial = vec![
        SharedListener::new(|_: &[u32]| Ok(())),
        SharedListener::new(|_: &[u32]| Ok(())),
    ];
    let bus = SharedEventBus::with_listeners(&initial);
    assert_eq!(bus.listeners(), initial);

    assert!(bus.remove(&initial[0]));
    assert_eq!(bus.len(), 1);
    assert_eq!(initial.len(), 2);
}
