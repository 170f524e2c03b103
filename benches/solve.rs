//! Search cost on the bundled warp puzzle, with and without forward checking.

// Criterion macros generate undocumented functions
#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use flowpath::{PuzzleConfig, SolverConfig};
use std::hint::black_box;

const MINIMAL: &str = include_str!("../demos/minimal.json");

fn bench_solve(c: &mut Criterion) {
    let Ok(board) = PuzzleConfig::from_json(MINIMAL).and_then(|config| config.build()) else {
        return;
    };
    let mut group = c.benchmark_group("solve_minimal");

    for forward_checking in [true, false] {
        let config = SolverConfig { forward_checking, ..SolverConfig::default() };
        group.bench_with_input(BenchmarkId::from_parameter(forward_checking), &config, |b, config| {
            b.iter(|| {
                let mut board = board.clone();
                black_box(board.solve_with(0, config).map(|report| report.solved))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_solve);
criterion_main!(benches);
