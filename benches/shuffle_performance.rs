//! Performance benchmarks for the shuffle and the channel registry

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use team_rooms::registry::ChannelRegistry;
use team_rooms::rooms::shuffle_members;
use team_rooms::types::ChannelId;

fn bench_shuffle(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("shuffle_ten_members", |b| {
        b.iter(|| {
            let mut members: Vec<u64> = (0..10).collect();
            shuffle_members(black_box(&mut members), &mut rng);
            members
        })
    });

    c.bench_function("shuffle_hundred_members", |b| {
        b.iter(|| {
            let mut members: Vec<u64> = (0..100).collect();
            shuffle_members(black_box(&mut members), &mut rng);
            members
        })
    });
}

fn bench_registry(c: &mut Criterion) {
    c.bench_function("registry_register_contains_unregister", |b| {
        let registry = ChannelRegistry::new();
        let mut next = 0u64;
        b.iter(|| {
            let id = ChannelId(next);
            next += 1;
            registry.register(black_box(id));
            registry.contains(black_box(id));
            registry.unregister(black_box(id));
        })
    });

    c.bench_function("registry_snapshot_1000_entries", |b| {
        let registry = ChannelRegistry::new();
        for raw in 0..1000 {
            registry.register(ChannelId(raw));
        }
        b.iter(|| black_box(registry.snapshot()))
    });
}

criterion_group!(benches, bench_shuffle, bench_registry);
criterion_main!(benches);
