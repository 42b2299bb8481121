use criterion::{Criterion, black_box, criterion_group, criterion_main};
use canary::{aqi_from_pm, bounds_from_lat_long, days_array};
use std::time::Duration;

fn bench_aqi_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aqi_operations");

    group.bench_function("aqi_from_pm_sweep", |b| {
        b.iter(|| {
            for step in 0..1000 {
                black_box(aqi_from_pm(black_box(step as f64)));
            }
        });
    });

    group.bench_function("aqi_description", |b| {
        b.iter(|| {
            for step in 0..1000 {
                black_box(aqi_from_pm(step as f64).description());
            }
        });
    });

    group.finish();
}

fn bench_geo_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("geo_operations");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("bounds_from_lat_long", |b| {
        b.iter(|| black_box(bounds_from_lat_long(35.1987522, -111.6518229, 16.0934)));
    });

    group.bench_function("days_array_one_month", |b| {
        b.iter(|| black_box(days_array("2022-03-01", "2022-03-31").unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_aqi_derivation, bench_geo_math);
criterion_main!(benches);
