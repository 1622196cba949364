use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use weather_dashboard::analyzers::Aggregator;
use weather_dashboard::models::RawObservation;
use weather_dashboard::processors::{IntegrityChecker, Normalizer};
use weather_dashboard::utils::constants::{DEFAULT_CATEGORIES, DEFAULT_CHECKPOINTS};

const WEATHER: [&str; 6] = ["drizzle", "fog", "rain", "snow", "sun", "hail"];

// Daily rows starting 2012-01-01, every tenth row repeated
fn create_test_rows(days: usize) -> Vec<RawObservation> {
    let base_date = NaiveDate::from_ymd_opt(2012, 1, 1).unwrap();
    let mut rows = Vec::with_capacity(days + days / 10);

    for day in 0..days {
        let date = base_date + Duration::days(day as i64);
        let seasonal = ((day % 365) as f64 / 365.0 * std::f64::consts::TAU).sin();
        let row = RawObservation::new(
            date.format("%Y-%m-%d").to_string(),
            (day % 7) as f64 * 1.3,
            15.0 + 10.0 * seasonal,
            7.0 + 8.0 * seasonal,
            2.0 + (day % 5) as f64,
            WEATHER[day % WEATHER.len()],
        );

        if day % 10 == 0 {
            rows.push(row.clone());
        }
        rows.push(row);
    }

    rows
}

fn benchmark_normalizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalizer");

    for days in [365, 1461, 3652] {
        let rows = create_test_rows(days);
        group.bench_with_input(BenchmarkId::new("normalize", days), &rows, |b, rows| {
            let normalizer = Normalizer::new();
            b.iter(|| normalizer.normalize(black_box(rows)).unwrap())
        });
    }

    group.finish();
}

fn benchmark_aggregations(c: &mut Criterion) {
    let rows = create_test_rows(3652);
    let set = Normalizer::new().normalize(&rows).unwrap().set;
    let aggregator = Aggregator::new(&set);
    let years = set.years();

    let mut group = c.benchmark_group("aggregations");

    group.bench_function("year_summary", |b| {
        b.iter(|| aggregator.year_summary(black_box(2015)).unwrap())
    });
    group.bench_function("monthly_mean_temp", |b| {
        b.iter(|| aggregator.monthly_mean_temp())
    });
    group.bench_function("monthly_precip_by_year", |b| {
        b.iter(|| aggregator.monthly_precip_by_year())
    });
    group.bench_function("monthly_weather_counts", |b| {
        b.iter(|| aggregator.monthly_weather_counts(black_box(&DEFAULT_CATEGORIES)))
    });
    group.bench_function("wind_series", |b| {
        b.iter(|| aggregator.wind_series(black_box(&years), black_box(&DEFAULT_CHECKPOINTS)))
    });

    group.finish();
}

fn benchmark_integrity_checker(c: &mut Criterion) {
    let rows = create_test_rows(3652);
    let set = Normalizer::new().normalize(&rows).unwrap().set;
    let checker = IntegrityChecker::default();

    c.bench_function("integrity_check", |b| {
        b.iter(|| checker.check_integrity(black_box(&set)))
    });
}

criterion_group!(
    benches,
    benchmark_normalizer,
    benchmark_aggregations,
    benchmark_integrity_checker
);
criterion_main!(benches);
