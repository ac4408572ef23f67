use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use zone_engine::{normalize_identifiers, project_hours, resolve_identifiers, DEFAULT_IDENTIFIERS};

fn bench_project_hours(c: &mut Criterion) {
    let ids = normalize_identifiers(DEFAULT_IDENTIFIERS);
    let zones = resolve_identifiers(&ids).resolved;
    let anchor = Utc.with_ymd_and_hms(2026, 3, 29, 0, 0, 0).unwrap();

    c.bench_function("project_hours_default_zones", |b| {
        b.iter(|| project_hours(black_box(anchor), black_box(&zones)))
    });
}

fn bench_resolve_identifiers(c: &mut Criterion) {
    let ids = [
        "UTC",
        "America/Los_Angeles",
        "europe/brussels",
        "+05:30",
        "Not/AZone",
    ];
    c.bench_function("resolve_identifiers_mixed", |b| {
        b.iter(|| resolve_identifiers(black_box(&ids)))
    });
}

criterion_group!(benches, bench_project_hours, bench_resolve_identifiers);
criterion_main!(benches);
