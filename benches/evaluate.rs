//! Evaluation and verification throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use plinko_fair::game::config::{BoardConfig, EngineConfig};
use plinko_fair::game::payout::PayoutTable;
use plinko_fair::{commit, evaluate, verify, SeedPair};

const SERVER_SEED: &str = "b2a5f3f32a4d9c6ee7a8c1d33456677890abcdeffedcba0987654321ffeeddcc";

fn bench_evaluate(c: &mut Criterion) {
    let config = EngineConfig::default();
    let seeds = SeedPair::new(SERVER_SEED, "candidate-hello", 42);

    c.bench_function("evaluate_12_rows", |b| {
        b.iter(|| evaluate(black_box(&seeds), black_box(6), &config))
    });

    let wide = EngineConfig::new(
        BoardConfig::new(32, 12).unwrap(),
        PayoutTable::new((0..=16).map(f64::from).collect()).unwrap(),
    )
    .unwrap();
    c.bench_function("evaluate_32_rows", |b| {
        b.iter(|| evaluate(black_box(&seeds), black_box(6), &wide))
    });
}

fn bench_verify(c: &mut Criterion) {
    let board = BoardConfig::default();
    let seeds = SeedPair::new(SERVER_SEED, "candidate-hello", 42);
    let commit_hex = commit(SERVER_SEED, 42);

    c.bench_function("verify_12_rows", |b| {
        b.iter(|| verify(black_box(&seeds), 6, &commit_hex, 6, &board))
    });
}

criterion_group!(benches, bench_evaluate, bench_verify);
criterion_main!(benches);
