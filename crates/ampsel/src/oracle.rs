//! Phase oracle marking a set of basis states.
//!
//! Each marked index `m` gets its own pass: bit-flip every qubit whose bit in
//! `m` is 0 so that `m` becomes the all-ones state, phase-flip all-ones, then
//! undo the bit-flips. The passes are diagonal and commute, so their order
//! does not matter.
//!
//! The gate form is emitted for inspection. Simulation negates the marked
//! amplitudes in place.

use tracing::trace;

use crate::error::{SelectError, SelectResult};
use crate::gate::GateSequence;
use crate::qubit::QubitId;
use crate::statevector::{MAX_QUBITS, StateVector, required_bytes};

/// Oracle that negates the amplitude of every marked basis state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Oracle {
    num_qubits: usize,
    /// Sorted, without duplicates.
    marked: Vec<usize>,
}

impl Oracle {
    /// Build an oracle over an `num_qubits`-qubit register.
    pub fn new(num_qubits: usize, marked: &[usize]) -> SelectResult<Self> {
        if num_qubits == 0 {
            return Err(SelectError::InvalidQubitCount(0));
        }
        if num_qubits > MAX_QUBITS {
            return Err(SelectError::SimulationOverflow {
                num_qubits,
                required_bytes: required_bytes(num_qubits),
                budget_bytes: required_bytes(MAX_QUBITS),
            });
        }
        let size = 1usize << num_qubits;
        if let Some(&index) = marked.iter().find(|&&m| m >= size) {
            return Err(SelectError::IndexOutOfRange { index, size });
        }

        let mut marked = marked.to_vec();
        marked.sort_unstable();
        marked.dedup();

        Ok(Self { num_qubits, marked })
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Marked basis states in ascending order.
    pub fn marked(&self) -> &[usize] {
        &self.marked
    }

    /// Whether the oracle marks nothing (and is therefore the identity).
    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    /// Append the oracle's gates to `sequence`.
    pub fn append_to(&self, sequence: &mut GateSequence) -> SelectResult<()> {
        for &m in &self.marked {
            let zeros: Vec<QubitId> = (0..self.num_qubits as u32)
                .filter(|&q| (m >> q) & 1 == 0)
                .map(QubitId)
                .collect();
            trace!(marked = m, flips = zeros.len(), "appending marking pass");

            for &q in &zeros {
                sequence.x(q)?;
            }
            sequence.phase_flip_all_ones()?;
            for &q in &zeros {
                sequence.x(q)?;
            }
        }
        Ok(())
    }

    /// The oracle as a standalone gate sequence.
    pub fn sequence(&self) -> SelectResult<GateSequence> {
        let mut sequence = GateSequence::with_width(self.num_qubits);
        self.append_to(&mut sequence)?;
        Ok(sequence)
    }

    /// Apply the oracle to a state.
    ///
    /// Negates the marked amplitudes directly; the result equals replaying
    /// [`sequence`](Self::sequence).
    pub fn apply(&self, state: &mut StateVector) -> SelectResult<()> {
        if state.num_qubits() != self.num_qubits {
            return Err(SelectError::QubitOutOfRange {
                qubit: (self.num_qubits - 1) as u32,
                num_qubits: state.num_qubits(),
            });
        }
        state.negate_amplitudes(&self.marked)
    }
}
