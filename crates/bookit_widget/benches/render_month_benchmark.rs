use bookit_common::models::{DayAvailability, MonthAvailability, TimeSlot};
use bookit_config::ApiConfig;
use bookit_widget::service::mock::InMemoryBookingApi;
use bookit_widget::{render_month, ApiLocator, AvailabilityCache, AvailabilityIndex, MonthKey};
use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

// Helper function to create a month where every `every`-th day has slots
fn create_month(month: MonthKey, every: u32) -> MonthAvailability {
    (0..month.days_in_month())
        .filter(|day| day % every == 0)
        .map(|day| {
            let date = month.first_day() + Days::new(u64::from(day));
            let slots = vec![TimeSlot {
                time: format!("{}T10:00:00Z", date),
                display: "10:00 AM".to_string(),
            }];
            (date, DayAvailability { date, slots, count: 1 })
        })
        .collect()
}

fn benchmark_render_month(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_month");
    let month = MonthKey::new(2024, 2);
    let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

    group.bench_function("empty_index", |b| {
        let index = AvailabilityIndex::default();
        b.iter(|| render_month(black_box(month), black_box(&index), black_box(today)))
    });

    group.bench_function("every_other_day", |b| {
        let index = AvailabilityIndex::build(&create_month(month, 2));
        b.iter(|| render_month(black_box(month), black_box(&index), black_box(today)))
    });

    group.bench_function("build_index", |b| {
        let data = create_month(month, 1);
        b.iter(|| AvailabilityIndex::build(black_box(&data)))
    });

    group.finish();
}

fn benchmark_cache_hit(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let api = Arc::new(InMemoryBookingApi::new().with_day("2024-03-05", &[("2024-03-05T10:00:00Z", "10:00 AM")]));
    let locator = Arc::new(ApiLocator::from_config(ApiConfig::default()).unwrap());
    let cache = rt.block_on(async {
        locator.discover(api.as_ref()).await.unwrap();
        let cache = AvailabilityCache::new(api.clone(), locator.clone());
        cache.get_month(MonthKey::new(2024, 2)).await.unwrap();
        cache
    });

    c.bench_function("get_month_cache_hit", |b| {
        b.to_async(&rt)
            .iter(|| async { cache.get_month(black_box(MonthKey::new(2024, 2))).await.unwrap() })
    });
}

criterion_group!(benches, benchmark_render_month, benchmark_cache_hit);
criterion_main!(benches);
