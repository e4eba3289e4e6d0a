// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for callback registration, firing, and native
// payload delivery in the tallyport-bridge crate.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tallyport_bridge::{
    CallbackHandle, CallbackKind, CallbackRegistry, InboundRelay, Payload, callback,
};
use tallyport_core::EventSuccess;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Fire a persistent kind repeatedly. Measures lock, clone of the handle
/// list, and invocation.
fn bench_fire_persistent(c: &mut Criterion) {
    let registry = CallbackRegistry::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let sink = hits.clone();
    registry.register(CallbackHandle::ConversionValueUpdated(callback(move |v: i32| {
        sink.fetch_add(v as usize, Ordering::Relaxed);
    })));

    c.bench_function("fire_persistent", |b| {
        b.iter(|| {
            let invoked = registry.fire(black_box(Payload::ConversionValueUpdated(1)));
            black_box(invoked);
        });
    });
}

/// Queue several authorization handles, then fire once. The one-shot path
/// empties the queue every iteration.
fn bench_register_and_fire_one_shot(c: &mut Criterion) {
    let registry = CallbackRegistry::new();

    let mut group = c.benchmark_group("authorization_batch");
    for &queued in &[1usize, 8, 64] {
        group.bench_function(format!("{queued} handles"), |b| {
            b.iter(|| {
                for _ in 0..queued {
                    registry.register(CallbackHandle::AuthorizationStatus(callback(|s: i32| {
                        black_box(s);
                    })));
                }
                let invoked = registry.fire(Payload::AuthorizationStatus(3));
                assert_eq!(invoked, queued);
            });
        });
    }
    group.finish();
}

/// Decode and deliver an event success payload through the relay.
fn bench_relay_event_success(c: &mut Criterion) {
    let registry = Arc::new(CallbackRegistry::new());
    registry.register(CallbackHandle::EventSuccess(callback(|s: EventSuccess| {
        black_box(s);
    })));
    let relay = InboundRelay::new(registry);
    let raw = r#"{"message":"Event tracked","timestamp":"2026-01-01T00:00:00.000Z","adid":"a1b2c3","eventToken":"abc123","callbackId":"cb-1","jsonResponse":"{\"status\":\"ok\"}"}"#;

    c.bench_function("relay_event_success", |b| {
        b.iter(|| {
            let invoked = relay.deliver(CallbackKind::EventSuccess, black_box(raw));
            black_box(invoked);
        });
    });
}

criterion_group!(
    benches,
    bench_fire_persistent,
    bench_register_and_fire_one_shot,
    bench_relay_event_success,
);
criterion_main!(benches);
