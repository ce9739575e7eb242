use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use matchday_core::models::{Activity, ActivityType, RepeatKind, WeekdaySet};
use matchday_core::recurrence::RecurrenceExpander;

fn repeating_activity(kind: RepeatKind, days: Option<WeekdaySet>) -> Activity {
    Activity {
        title: "Benchmark training".to_string(),
        kind: ActivityType::Training,
        start_at: Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap(),
        is_repeating: true,
        repeat_kind: Some(kind),
        repeat_days: days,
        repeat_until: NaiveDate::from_ymd_opt(2030, 12, 31),
        ..Default::default()
    }
}

fn bench_expander_creation(c: &mut Criterion) {
    let activity = repeating_activity(RepeatKind::Daily, None);

    c.bench_function("expander_creation", |b| {
        b.iter(|| RecurrenceExpander::new(black_box(activity.clone())).unwrap())
    });
}

fn bench_window_expansion(c: &mut Criterion) {
    let daily = RecurrenceExpander::new(repeating_activity(RepeatKind::Daily, None)).unwrap();
    let weekly = RecurrenceExpander::new(repeating_activity(
        RepeatKind::Weekly,
        Some(WeekdaySet::from_days([1, 3, 5]).unwrap()),
    ))
    .unwrap();

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let mut group = c.benchmark_group("window_expansion");
    for days in [7i64, 30, 90, 365].iter() {
        let end = start + Duration::days(*days);
        group.bench_with_input(BenchmarkId::new("daily_days", days), days, |b, _| {
            b.iter(|| daily.occurrences_between(black_box(start), black_box(end)))
        });
        group.bench_with_input(BenchmarkId::new("weekly_mwf_days", days), days, |b, _| {
            b.iter(|| weekly.occurrences_between(black_box(start), black_box(end)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_expander_creation, bench_window_expansion);
criterion_main!(benches);
