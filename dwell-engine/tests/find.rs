// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dwell_engine::test_helpers::start_test;
use dwell_engine::waits::find::WaitForObject;

#[derive(Debug, PartialEq)]
struct Door {
    name: String,
}

#[test]
fn found_object_passed_to_callback() {
    let scheduler = start_test();
    let lookups = Rc::new(Cell::new(0));
    let received = Rc::new(RefCell::new(None));

    let count = lookups.clone();
    let clock = scheduler.clock();
    let found = received.clone();
    scheduler.spawn(
        WaitForObject::new(
            move || {
                count.set(count.get() + 1);
                (count.get() == 3).then(|| Door {
                    name: "front".to_string(),
                })
            },
            1.0,
        )
        .then(move |door| {
            *found.borrow_mut() = Some((door, clock.now_secs()));
            Ok(())
        }),
    );

    scheduler.run_until_idle().unwrap();

    // Found on the third lookup at 3s, delivered one interval later
    assert_eq!(lookups.get(), 3);
    assert_eq!(
        *received.borrow(),
        Some((
            Door {
                name: "front".to_string()
            },
            4.0
        ))
    );
}

#[test]
fn present_object_still_waits_one_interval() {
    let scheduler = start_test();
    let lookups = Rc::new(Cell::new(0));

    let count = lookups.clone();
    scheduler.spawn(WaitForObject::new(
        move || {
            count.set(count.get() + 1);
            Some(42)
        },
        1.0,
    ));

    assert_eq!(scheduler.run_until_idle().unwrap(), 2);
    assert_eq!(lookups.get(), 1);
}
