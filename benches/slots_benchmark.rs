use chrono::{NaiveDate, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use facility_hub::models::{Booking, BookingStatus};
use facility_hub::services::slots::{available_slots, slots_held_by};
use std::collections::BTreeSet;
use std::hint::black_box;

fn make_bookings(count: usize) -> Vec<Booking> {
    let date = NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();
    (0..count)
        .map(|i| Booking {
            booking_id: format!("b{}", i),
            facility_id: "court".to_string(),
            date,
            booked_slots: [(i % 24) as u8].into_iter().collect(),
            user_id: format!("u{}", i % 50),
            status: if i % 3 == 0 {
                BookingStatus::Declined
            } else {
                BookingStatus::Pending
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .collect()
}

fn benchmark_availability(c: &mut Criterion) {
    let facility_slots: BTreeSet<u8> = (0..24).collect();
    let small = make_bookings(10);
    let large = make_bookings(1000);

    let mut group = c.benchmark_group("slot_availability");

    group.bench_function("available_slots_10", |b| {
        b.iter(|| available_slots(black_box(&facility_slots), black_box(&small)))
    });

    group.bench_function("available_slots_1000", |b| {
        b.iter(|| available_slots(black_box(&facility_slots), black_box(&large)))
    });

    group.bench_function("slots_held_by_1000", |b| {
        b.iter(|| slots_held_by(black_box("u7"), black_box(&large)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_availability);
criterion_main!(benches);
