//! Grover diffusion operator (inversion about the mean).
//!
//! `H⊗n · X⊗n · MCZ · X⊗n · H⊗n`, where the bit-flips map |0...0⟩ onto the
//! all-ones state that the multi-controlled phase flip acts on. The result is
//! `I - 2|s⟩⟨s|`, i.e. `2|s⟩⟨s| - I` up to a global phase.

use crate::error::{SelectError, SelectResult};
use crate::gate::GateSequence;
use crate::statevector::StateVector;

/// The diffusion operator for a register of fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diffusion {
    num_qubits: usize,
}

impl Diffusion {
    /// Create the operator for `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> SelectResult<Self> {
        if num_qubits == 0 {
            return Err(SelectError::InvalidQubitCount(0));
        }
        Ok(Self { num_qubits })
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Append the diffusion gates to `sequence`.
    pub fn append_to(&self, sequence: &mut GateSequence) -> SelectResult<()> {
        sequence
            .h_all()?
            .x_all()?
            .phase_flip_all_ones()?
            .x_all()?
            .h_all()?;
        Ok(())
    }

    /// The diffusion operator as a standalone gate sequence.
    pub fn sequence(&self) -> SelectResult<GateSequence> {
        let mut sequence = GateSequence::with_width(self.num_qubits);
        self.append_to(&mut sequence)?;
        Ok(sequence)
    }

    /// Apply the operator to a state.
    ///
    /// Runs as one inversion about the mean, equal to replaying
    /// [`sequence`](Self::sequence).
    pub fn apply(&self, state: &mut StateVector) -> SelectResult<()> {
        if state.num_qubits() != self.num_qubits {
            return Err(SelectError::QubitOutOfRange {
                qubit: (self.num_qubits - 1) as u32,
                num_qubits: state.num_qubits(),
            });
        }
        state.invert_about_mean();
        Ok(())
    }
}
