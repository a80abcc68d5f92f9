//! Criterion benchmarks for the input path: key lookup, edge filtering and
//! the busy/queue discipline.
//!
//! Run with:
//! ```bash
//! cargo bench --package gamescreen-core --bench input_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gamescreen_core::domain::buttons::ButtonMap;
use gamescreen_core::domain::input::KeyEdgeState;
use gamescreen_core::domain::queue::OutboundQueue;
use gamescreen_core::{Button, ControllerEvent, OutboundEvent, Polarity, RequestOutcome, ScreenController};

const CODES: &[&str] = &[
    "KeyA", "KeyB", "KeyF", "Space", "ArrowRight", "ArrowLeft", "ArrowUp", "ArrowDown", "Enter",
    "KeyZ",
];

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("button_map_lookup");
    for code in CODES {
        group.bench_with_input(BenchmarkId::from_parameter(code), code, |b, code| {
            b.iter(|| ButtonMap::lookup(black_box(code)))
        });
    }
    group.finish();
}

fn bench_edges(c: &mut Criterion) {
    c.bench_function("key_edge_press_release", |b| {
        let mut state = KeyEdgeState::new();
        b.iter(|| {
            state.apply(black_box(Button::A), Polarity::Down);
            state.apply(black_box(Button::A), Polarity::Up);
        })
    });
    c.bench_function("key_edge_auto_repeat", |b| {
        let mut state = KeyEdgeState::new();
        state.apply(Button::Start, Polarity::Down);
        b.iter(|| state.apply(black_box(Button::Start), Polarity::Down))
    });
}

fn bench_queue(c: &mut Criterion) {
    c.bench_function("queue_submit_complete_burst", |b| {
        b.iter(|| {
            let mut queue = OutboundQueue::default();
            for button in Button::ALL {
                queue.submit(black_box(OutboundEvent::down(button)));
            }
            while queue.complete().is_some() {}
        })
    });
}

fn bench_controller_keys(c: &mut Criterion) {
    let mut controller = ScreenController::default();
    controller.init();
    controller.handle(ControllerEvent::SocketOpened);

    c.bench_function("controller_key_round_trip", |b| {
        b.iter(|| {
            controller.handle(ControllerEvent::KeyDown(black_box("KeyA").to_string()));
            controller.handle(ControllerEvent::RequestCompleted(RequestOutcome::Acknowledged));
            controller.handle(ControllerEvent::KeyUp(black_box("KeyA").to_string()));
            controller.handle(ControllerEvent::RequestCompleted(RequestOutcome::Acknowledged));
        })
    });
}

criterion_group!(
    input_benches,
    bench_lookup,
    bench_edges,
    bench_queue,
    bench_controller_keys
);
criterion_main!(input_benches);
