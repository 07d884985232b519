//! Amplitude-amplification behaviour of the runner and its building blocks.

use ampsel::{
    Diffusion, GroverRunner, IterationPolicy, Oracle, QubitId, RoundingRule, StateVector,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn textbook_policy() -> IterationPolicy {
    IterationPolicy::new(RoundingRule::Floor)
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

#[test]
fn hadamard_all_is_normalized() {
    for n in 1..=10 {
        let mut sv = StateVector::new(n).unwrap();
        sv.apply_hadamard_all();
        assert!((sv.norm_sqr() - 1.0).abs() < 1e-9, "n = {n}");
    }
}

#[test]
fn grover_rounds_preserve_norm() {
    for n in 1..=6 {
        let runner = GroverRunner::new(n, &[0], &textbook_policy())
            .unwrap()
            .with_iterations(5);
        let state = runner.prepare_state().unwrap();
        assert!((state.norm_sqr() - 1.0).abs() < 1e-9, "n = {n}");
    }
}

// ---------------------------------------------------------------------------
// Oracle
// ---------------------------------------------------------------------------

#[test]
fn oracle_negates_only_marked_states() {
    for n in 1..=4 {
        let size = 1usize << n;
        let marked: Vec<usize> = (0..size).filter(|i| i % 3 == 1).collect();
        let oracle = Oracle::new(n, &marked).unwrap();

        let mut sv = StateVector::new(n).unwrap();
        sv.apply_hadamard_all();
        let before = sv.amplitudes().to_vec();
        oracle.apply(&mut sv).unwrap();

        for i in 0..size {
            let expected = if marked.contains(&i) {
                -before[i]
            } else {
                before[i]
            };
            assert!(
                (sv.amplitudes()[i] - expected).norm() < 1e-12,
                "n = {n}, index {i}"
            );
        }
    }
}

#[test]
fn oracle_then_diffusion_round_trip_by_hand() {
    // Build one round manually and compare with the runner's state.
    let runner = GroverRunner::new(3, &[6], &textbook_policy())
        .unwrap()
        .with_iterations(1);

    let mut sv = StateVector::new(3).unwrap();
    sv.apply_hadamard_all();
    Oracle::new(3, &[6]).unwrap().apply(&mut sv).unwrap();
    Diffusion::new(3).unwrap().apply(&mut sv).unwrap();

    let state = runner.prepare_state().unwrap();
    for (a, b) in sv.amplitudes().iter().zip(state.amplitudes()) {
        assert!((a - b).norm() < 1e-12);
    }
    // After one round of N=8, M=1 the marked probability is sin²(3θ) = 0.78125.
    assert!((state.probability(6) - 0.78125).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Amplification
// ---------------------------------------------------------------------------

#[test]
fn single_marked_state_dominates() {
    let runner = GroverRunner::new(3, &[5], &textbook_policy()).unwrap();
    assert_eq!(runner.iterations(), 2);

    let mut rng = SmallRng::seed_from_u64(2024);
    let outcome = runner.run_with_rng(1024, &mut rng).unwrap();

    assert_eq!(outcome.index, 5);
    assert!(outcome.marked_probability > 0.9);
    assert!(outcome.counts.frequency(5) > 0.9);
    assert_eq!(outcome.counts.shots(), 1024);
}

#[test]
fn two_marked_states_dominate() {
    let runner = GroverRunner::new(3, &[2, 5], &textbook_policy()).unwrap();
    assert_eq!(runner.iterations(), 1);

    let mut rng = SmallRng::seed_from_u64(99);
    let outcome = runner.run_with_rng(1024, &mut rng).unwrap();

    assert!(outcome.index == 2 || outcome.index == 5);
    assert!((outcome.marked_probability - 1.0).abs() < 1e-9);
    assert_eq!(outcome.counts.get(2) + outcome.counts.get(5), 1024);
}

#[test]
fn single_qubit_search() {
    // N=2, M=1: amplification cannot beat 1/2, but nothing may break.
    let runner = GroverRunner::new(1, &[1], &textbook_policy()).unwrap();
    let state = runner.prepare_state().unwrap();
    assert!((state.norm_sqr() - 1.0).abs() < 1e-9);
    assert!((state.probability(1) - runner.expected_success_probability()).abs() < 1e-9);
}

#[test]
fn probability_tracks_theory_for_each_rounding_rule() {
    for rule in [
        RoundingRule::Nearest,
        RoundingRule::Floor,
        RoundingRule::Ceiling,
    ] {
        for (n, marked) in [(3, vec![1]), (4, vec![3]), (4, vec![0, 9, 12]), (5, vec![17])] {
            let runner = GroverRunner::new(n, &marked, &IterationPolicy::new(rule)).unwrap();
            let state = runner.prepare_state().unwrap();
            let measured: f64 = marked.iter().map(|&m| state.probability(m)).sum();
            assert!(
                (measured - runner.expected_success_probability()).abs() < 1e-9,
                "{rule} n={n} marked={marked:?}"
            );
        }
    }
}

#[test]
fn marked_state_of_equal_weight_after_amplification() {
    let runner = GroverRunner::new(4, &[3, 10], &textbook_policy()).unwrap();
    let state = runner.prepare_state().unwrap();
    assert!((state.probability(3) - state.probability(10)).abs() < 1e-12);
    // Unmarked states share the remainder evenly.
    let p0 = state.probability(0);
    for i in (0..16).filter(|&i| i != 3 && i != 10) {
        assert!((state.probability(i) - p0).abs() < 1e-12);
    }
}

#[test]
fn bit_order_matches_between_marking_and_decoding() {
    // Index 1 is qubit 0 set; a bit-reversed oracle would amplify index 4.
    let runner = GroverRunner::new(3, &[1], &textbook_policy()).unwrap();
    let state = runner.prepare_state().unwrap();
    assert!(state.probability(1) > 0.9);
    assert!(state.probability(4) < 0.05);

    let mut sv = StateVector::new(3).unwrap();
    sv.apply_bit_flip(QubitId(0)).unwrap();
    assert!((sv.probability(1) - 1.0).abs() < 1e-12);
}
