use coinflip::{
    db::MemoryStore,
    game::{ActiveGames, BetRequest, CoinSide, GameConfig, Resolver},
    ledger::Ledger,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::{hint::black_box, sync::Arc};

/// Helper to create a resolver where every user starts rich enough to never run dry
fn setup_resolver() -> Resolver {
    let store = MemoryStore::new();
    let ledger = Ledger::new(Arc::new(store.clone()), i64::MAX / 4);
    Resolver::new(ledger, Arc::new(store), GameConfig::default())
}

/// Benchmark a full resolve over the memory store
fn bench_resolve(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Failed to build runtime");
    let resolver = setup_resolver();

    c.bench_function("resolve_single_user", |b| {
        b.iter(|| {
            rt.block_on(resolver.resolve(black_box(BetRequest::new(1, CoinSide::Heads, 10))))
                .unwrap()
        });
    });

    let mut group = c.benchmark_group("resolve_user_spread");
    for users in [1i64, 100, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(users), &users, |b, &users| {
            let mut next = 0i64;
            b.iter(|| {
                next = (next + 1) % users;
                rt.block_on(resolver.resolve(BetRequest::new(next, CoinSide::Tails, 10)))
                    .unwrap()
            });
        });
    }
    group.finish();
}

/// Benchmark acquiring and releasing a game slot
fn bench_guard(c: &mut Criterion) {
    let games = ActiveGames::new();

    c.bench_function("guard_acquire_release", |b| {
        b.iter(|| {
            let guard = games.try_acquire(black_box(7)).unwrap();
            drop(guard);
        });
    });
}

criterion_group!(benches, bench_resolve, bench_guard);
criterion_main!(benches);
