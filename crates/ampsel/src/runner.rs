//! Grover search over a marked subset of basis states.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument, trace};

use crate::counts::Counts;
use crate::diffusion::Diffusion;
use crate::error::{SelectError, SelectResult};
use crate::gate::GateSequence;
use crate::iterations::{IterationPolicy, success_probability};
use crate::oracle::Oracle;
use crate::statevector::{StateVector, required_bytes};

/// Result of one Grover run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroverOutcome {
    /// Sampled basis state (most frequent one for multi-shot runs).
    pub index: usize,
    /// Oracle + diffusion rounds applied.
    pub iterations: usize,
    /// Every shot, by outcome.
    pub counts: Counts,
    /// Total probability on the marked states just before measurement.
    pub marked_probability: f64,
}

/// Runs amplitude amplification for one marked set.
///
/// Each run builds its own [`StateVector`]; nothing is shared between runs.
#[derive(Debug, Clone)]
pub struct GroverRunner {
    oracle: Oracle,
    diffusion: Diffusion,
    iterations: usize,
}

impl GroverRunner {
    /// Prepare a runner for `num_qubits` qubits and the given marked states.
    ///
    /// Fails with [`SelectError::NoMarkedStates`] when `marked` is empty.
    pub fn new(num_qubits: usize, marked: &[usize], policy: &IterationPolicy) -> SelectResult<Self> {
        let oracle = Oracle::new(num_qubits, marked)?;
        let diffusion = Diffusion::new(num_qubits)?;
        let iterations = policy
            .iterations(1 << num_qubits, oracle.marked().len())
            .ok_or(SelectError::NoMarkedStates)?;
        Ok(Self {
            oracle,
            diffusion,
            iterations,
        })
    }

    /// Reject the runner if its amplitude vector exceeds `budget_bytes`.
    pub fn with_memory_budget(self, budget_bytes: u64) -> SelectResult<Self> {
        let num_qubits = self.num_qubits();
        let required = required_bytes(num_qubits);
        if required > u128::from(budget_bytes) {
            return Err(SelectError::SimulationOverflow {
                num_qubits,
                required_bytes: required,
                budget_bytes: u128::from(budget_bytes),
            });
        }
        Ok(self)
    }

    /// Override the iteration count chosen by the policy.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.oracle.num_qubits()
    }

    /// Rounds of oracle + diffusion.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Marked basis states.
    pub fn marked(&self) -> &[usize] {
        self.oracle.marked()
    }

    /// Theoretical probability of sampling a marked state.
    pub fn expected_success_probability(&self) -> f64 {
        success_probability(1 << self.num_qubits(), self.marked().len(), self.iterations)
    }

    /// The full circuit: superposition, then every round, without measurement.
    pub fn circuit(&self) -> SelectResult<GateSequence> {
        let mut circuit = GateSequence::with_width(self.num_qubits());
        circuit.h_all()?;
        let round = self.round()?;
        for _ in 0..self.iterations {
            circuit.extend_from(&round)?;
        }
        Ok(circuit)
    }

    /// Evolve a fresh register to the state right before measurement.
    ///
    /// Each round is a constant number of passes over the amplitudes,
    /// independent of how many states are marked.
    pub fn prepare_state(&self) -> SelectResult<StateVector> {
        let mut state = StateVector::new(self.num_qubits())?;
        state.apply_hadamard_all();

        for r in 0..self.iterations {
            self.oracle.apply(&mut state)?;
            self.diffusion.apply(&mut state)?;
            trace!(
                round = r + 1,
                marked_probability = self.marked_probability(&state),
                "grover round applied"
            );
        }
        Ok(state)
    }

    /// Run the search and measure `shots` times with the given RNG.
    #[instrument(skip(self, rng), fields(num_qubits = self.num_qubits(), marked = self.marked().len()))]
    pub fn run_with_rng<R: Rng + ?Sized>(&self, shots: u32, rng: &mut R) -> SelectResult<GroverOutcome> {
        if shots == 0 {
            return Err(SelectError::InvalidShots(0));
        }
        let start = Instant::now();

        let state = self.prepare_state()?;
        let marked_probability = self.marked_probability(&state);

        let counts = state.sample_counts_with_rng(shots, rng);
        let index = counts.most_frequent().unwrap_or(0);

        debug!(
            iterations = self.iterations,
            shots,
            index,
            marked_probability,
            elapsed = ?start.elapsed(),
            "grover run completed"
        );

        Ok(GroverOutcome {
            index,
            iterations: self.iterations,
            counts,
            marked_probability,
        })
    }

    /// Run the search using the thread-local RNG.
    pub fn run(&self, shots: u32) -> SelectResult<GroverOutcome> {
        self.run_with_rng(shots, &mut rand::thread_rng())
    }

    fn round(&self) -> SelectResult<GateSequence> {
        let mut round = GateSequence::with_width(self.num_qubits());
        self.oracle.append_to(&mut round)?;
        self.diffusion.append_to(&mut round)?;
        Ok(round)
    }

    fn marked_probability(&self, state: &StateVector) -> f64 {
        self.marked().iter().map(|&m| state.probability(m)).sum()
    }
}
