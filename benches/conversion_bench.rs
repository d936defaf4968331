//! Criterion benchmark for the conversion policy.
//!
//! The policy runs on every claim request under the per-player lock,
//! so it should stay in the low-nanosecond range.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bitmon_rewards_api::domain::conversion::ConversionPolicy;
use bitmon_rewards_api::domain::points::PointBalance;

fn bench_quote(c: &mut Criterion) {
    let policy = ConversionPolicy::default();

    c.bench_function("quote_eligible_pvp", |b| {
        b.iter(|| policy.quote(black_box(PointBalance { pvp: 123_456, pve: 789 })))
    });

    c.bench_function("quote_ineligible", |b| {
        b.iter(|| policy.quote(black_box(PointBalance { pvp: 999, pve: 4999 })))
    });
}

criterion_group!(benches, bench_quote);
criterion_main!(benches);
