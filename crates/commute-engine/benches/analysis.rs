use std::hint::black_box;

use chrono::{TimeZone, Utc};
use commute_engine::{
    analyze_window, apply_correction, collect_samples, commentary, generate_departure_times,
    SyntheticProvider, TimeOfDayMultiplier,
};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_departure_times(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2026, 3, 16, 15, 0, 0).unwrap();
    c.bench_function("generate_departure_times", |b| {
        b.iter(|| generate_departure_times(black_box(now), "06:30", "07:40", 10, 1))
    });
}

fn bench_window_analysis(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2026, 3, 16, 15, 0, 0).unwrap();
    let times = generate_departure_times(now, "06:30", "07:40", 10, 1).unwrap();
    let samples = apply_correction(
        &TimeOfDayMultiplier::default(),
        &collect_samples(&SyntheticProvider::new(1800), &times),
    );
    let goal = times[0] + 3 * 3600;

    let mut group = c.benchmark_group("window");
    group.bench_function("analyze_window", |b| {
        b.iter(|| analyze_window(black_box(&samples), black_box(goal)))
    });
    group.bench_function("analyze_and_comment", |b| {
        b.iter(|| {
            let analysis = analyze_window(black_box(&samples), goal).unwrap();
            commentary(&analysis.analyzed())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_departure_times, bench_window_analysis);
criterion_main!(benches);
