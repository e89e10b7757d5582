//! Benchmarks for move generation, evaluation and search.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ferrum::board::{evaluate, perft, MoveList, Position};
use ferrum::search::{SearchEngine, SearchLimits};
use ferrum::tt::TranspositionTable;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn bench_perft(c: &mut Criterion) {
    ferrum::board::init_tables();
    let mut group = c.benchmark_group("perft");

    let mut startpos = Position::new();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| perft(&mut startpos, black_box(depth)));
        });
    }

    let mut kiwipete = Position::new();
    kiwipete.set_from_fen(KIWIPETE).unwrap();
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| perft(&mut kiwipete, black_box(depth)));
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    ferrum::board::init_tables();
    let mut group = c.benchmark_group("movegen");

    let startpos = Position::new();
    group.bench_function("startpos", |b| {
        b.iter(|| {
            let mut moves = MoveList::new();
            startpos.generate_moves(black_box(&mut moves));
            moves.len()
        });
    });

    let mut kiwipete = Position::new();
    kiwipete.set_from_fen(KIWIPETE).unwrap();
    group.bench_function("kiwipete", |b| {
        b.iter(|| {
            let mut moves = MoveList::new();
            kiwipete.generate_moves(black_box(&mut moves));
            moves.len()
        });
    });

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    ferrum::board::init_tables();
    let mut group = c.benchmark_group("evaluate");

    let startpos = Position::new();
    group.bench_function("startpos", |b| b.iter(|| evaluate(black_box(&startpos))));

    let mut kiwipete = Position::new();
    kiwipete.set_from_fen(KIWIPETE).unwrap();
    group.bench_function("kiwipete", |b| b.iter(|| evaluate(black_box(&kiwipete))));

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    ferrum::board::init_tables();
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    group.bench_function("startpos_depth_5", |b| {
        b.iter(|| {
            let mut position = Position::new();
            let mut tt = TranspositionTable::new(16);
            let stop = Arc::new(AtomicBool::new(false));
            let limits = SearchLimits {
                depth: Some(5),
                ..SearchLimits::default()
            };
            let mut engine = SearchEngine::new(stop, limits);
            engine.search(&mut position, &mut tt);
            engine.nodes()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen, bench_evaluate, bench_search);
criterion_main!(benches);
