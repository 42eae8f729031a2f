//! Roll Selection Performance Benchmark
//!
//! Measures the time-of-day cue scan and a full engine tick over a large
//! rundown.
//!
//! **Goal:** A roll pass must be negligible next to the 1 s tick
//! **Target:** <50 µs for 1000 cues

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use showrun_common::time::ManualTime;
use showrun_common::CueEvent;
use showrun_engine::config::HttpTriggers;
use showrun_engine::integrations::NullIntegrations;
use showrun_engine::playback::{select_by_roll, PlaybackEngine};
use showrun_engine::state::SharedState;

/// Back-to-back 60 s cues, every third one public
fn rundown(len: usize) -> Vec<CueEvent> {
    (0..len)
        .map(|i| {
            let start = i as i64 * 60_000;
            CueEvent {
                id: format!("cue-{}", i),
                time_start: start,
                time_end: start + 60_000,
                is_public: i % 3 == 0,
                title: format!("Cue {}", i),
                ..Default::default()
            }
        })
        .collect()
}

fn bench_select_by_roll(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_by_roll");

    for len in [10usize, 100, 1000] {
        let events = rundown(len);
        let middle = (len as i64 / 2) * 60_000 + 30_000;

        group.bench_with_input(BenchmarkId::new("mid_rundown", len), &events, |b, events| {
            b.iter(|| black_box(select_by_roll(black_box(events), black_box(middle))));
        });

        group.bench_with_input(BenchmarkId::new("before_first", len), &events, |b, events| {
            b.iter(|| black_box(select_by_roll(black_box(events), black_box(0))));
        });
    }

    group.finish();
}

fn bench_rolling_tick(c: &mut Criterion) {
    let time = ManualTime::new(30_000);
    let mut engine = PlaybackEngine::new(
        Arc::new(time.clone()),
        Arc::new(NullIntegrations),
        Arc::new(SharedState::new()),
        HttpTriggers::default(),
    );
    engine.setup_with_event_list(rundown(1000));
    engine.trigger("roll");

    c.bench_function("rolling_tick_1000", |b| {
        b.iter(|| {
            time.advance(100);
            engine.tick();
        });
    });
}

criterion_group!(benches, bench_select_by_roll, bench_rolling_tick);
criterion_main!(benches);
