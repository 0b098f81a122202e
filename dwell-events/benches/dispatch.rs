// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Benchmark event dispatch.

use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use dwell_events::bus::EventBus;
use dwell_events::shared::SharedEventBus;
use dwell_events::traits::Subscribe;

fn counting_bus(num_listeners: usize) -> (EventBus<u64>, Rc<Cell<u64>>) {
    let bus = EventBus::new();
    let total = Rc::new(Cell::new(0));
    for _ in 0..num_listeners {
        let total = total.clone();
        bus.add_fn(move |args: &[u64]| {
            total.set(total.get() + args.iter().sum::<u64>());
            Ok(())
        });
    }
    (bus, total)
}

fn invoke_benchmarks(c: &mut Criterion) {
    for num_listeners in [1, 16, 256] {
        let (bus, total) = counting_bus(num_listeners);
        c.bench_function(&format!("invoke_{num_listeners}_listeners"), |b| {
            b.iter(|| bus.invoke(black_box(&[1u64, 2, 3][..])).unwrap())
        });
        black_box(total.get());
    }

    let shared: SharedEventBus<u64> = SharedEventBus::new();
    for _ in 0..16 {
        shared.add_fn(|args| {
            black_box(args);
            Ok(())
        });
    }
    c.bench_function("shared_invoke_16_listeners", |b| {
        b.iter(|| shared.invoke(black_box(&[1u64, 2, 3][..])).unwrap())
    });
}

fn churn_benchmarks(c: &mut Criterion) {
    c.bench_function("add_remove_256", |b| {
        b.iter_batched(
            || counting_bus(256),
            |(bus, _)| {
                for listener in bus.listeners().to_vec() {
                    bus.remove(&listener);
                }
                bus
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, invoke_benchmarks, churn_benchmarks);
criterion_main!(benches);
