//! Benchmarks for the selector and its simulation
//!
//! Run with: cargo bench -p ampsel

use ampsel::{CandidateSelector, Direction, GroverRunner, IterationPolicy, StateVector};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Benchmark preparing the uniform superposition
fn bench_hadamard_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("hadamard_all");

    for num_qubits in &[4, 8, 12, 16] {
        group.bench_with_input(
            BenchmarkId::new("qubits", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| {
                    let mut sv = StateVector::new(black_box(n)).unwrap();
                    sv.apply_hadamard_all();
                    black_box(sv)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark evolving the state through every Grover round
fn bench_prepare_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare_state");

    for num_qubits in &[3, 6, 9, 12] {
        let marked: Vec<usize> = vec![1, (1 << num_qubits) - 2];
        let runner = GroverRunner::new(*num_qubits, &marked, &IterationPolicy::default()).unwrap();
        group.bench_with_input(
            BenchmarkId::new("qubits", num_qubits),
            &runner,
            |b, runner| {
                b.iter(|| black_box(runner.prepare_state().unwrap()));
            },
        );
    }

    group.finish();
}

/// Benchmark end-to-end selection over typical candidate counts
fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");
    let selector = CandidateSelector::default();

    for count in &[5_usize, 20, 40, 200] {
        let scores: Vec<f64> = (0..*count).map(|i| ((i * 37) % 11) as f64).collect();
        group.bench_with_input(BenchmarkId::new("candidates", count), &scores, |b, scores| {
            let mut rng = SmallRng::seed_from_u64(0);
            b.iter(|| {
                black_box(
                    selector
                        .select_index_with_rng(scores, Direction::Maximize, &mut rng)
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hadamard_all, bench_prepare_state, bench_select);
criterion_main!(benches);
