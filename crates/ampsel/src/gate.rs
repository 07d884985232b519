//! Gate vocabulary and gate sequences.
//!
//! The selector needs only a handful of gates: Hadamard, bit-flip, the phase
//! flip and its multi-controlled form. The multi-controlled NOT is kept so the
//! phase flip can be cross-checked against its `H · MCX · H` decomposition.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SelectError, SelectResult};
use crate::qubit::QubitId;

/// A gate acting on the register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gate {
    /// Hadamard gate.
    H(QubitId),
    /// Bit-flip (Pauli-X) gate.
    X(QubitId),
    /// Phase-flip (Pauli-Z) gate.
    Z(QubitId),
    /// Multi-controlled phase flip: negates states where the target and all
    /// controls are 1.
    Mcz {
        /// Target qubit.
        target: QubitId,
        /// Control qubits; may be empty, in which case this acts as `Z`.
        controls: Vec<QubitId>,
    },
    /// Multi-controlled bit flip on the target.
    Mcx {
        /// Target qubit.
        target: QubitId,
        /// Control qubits; may be empty, in which case this acts as `X`.
        controls: Vec<QubitId>,
    },
}

impl Gate {
    /// Short lowercase name of the gate.
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H(_) => "h",
            Gate::X(_) => "x",
            Gate::Z(_) => "z",
            Gate::Mcz { .. } => "mcz",
            Gate::Mcx { .. } => "mcx",
        }
    }

    /// All qubits the gate touches, target last for controlled gates.
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Gate::H(q) | Gate::X(q) | Gate::Z(q) => vec![*q],
            Gate::Mcz { target, controls } | Gate::Mcx { target, controls } => {
                let mut qs = controls.clone();
                qs.push(*target);
                qs
            }
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::H(q) | Gate::X(q) | Gate::Z(q) => write!(f, "{} {q}", self.name()),
            Gate::Mcz { target, controls } | Gate::Mcx { target, controls } => {
                write!(f, "{} [", self.name())?;
                for (i, c) in controls.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{c}")?;
                }
                write!(f, "] -> {target}")
            }
        }
    }
}

/// An ordered list of gates over a fixed-width register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSequence {
    num_qubits: usize,
    gates: Vec<Gate>,
}

impl GateSequence {
    /// Create an empty sequence for a register of `num_qubits` qubits.
    pub fn with_width(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
        }
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether the sequence contains no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// The gates in application order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Iterate over the gates in application order.
    pub fn iter(&self) -> impl Iterator<Item = &Gate> {
        self.gates.iter()
    }

    /// Count gates with the given name.
    pub fn count_named(&self, name: &str) -> usize {
        self.gates.iter().filter(|g| g.name() == name).count()
    }

    /// Append a gate after checking its qubits against the register width.
    pub fn push(&mut self, gate: Gate) -> SelectResult<&mut Self> {
        for q in gate.qubits() {
            self.check_qubit(q)?;
        }
        self.gates.push(gate);
        Ok(self)
    }

    /// Append every gate of `other`.
    pub fn extend_from(&mut self, other: &GateSequence) -> SelectResult<&mut Self> {
        for gate in other.iter() {
            self.push(gate.clone())?;
        }
        Ok(self)
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// Apply Hadamard.
    pub fn h(&mut self, qubit: QubitId) -> SelectResult<&mut Self> {
        self.push(Gate::H(qubit))
    }

    /// Apply bit-flip.
    pub fn x(&mut self, qubit: QubitId) -> SelectResult<&mut Self> {
        self.push(Gate::X(qubit))
    }

    /// Apply phase flip.
    pub fn z(&mut self, qubit: QubitId) -> SelectResult<&mut Self> {
        self.push(Gate::Z(qubit))
    }

    /// Apply a multi-controlled phase flip.
    pub fn mcz(&mut self, target: QubitId, controls: &[QubitId]) -> SelectResult<&mut Self> {
        self.push(Gate::Mcz {
            target,
            controls: controls.to_vec(),
        })
    }

    /// Apply a multi-controlled bit flip.
    pub fn mcx(&mut self, target: QubitId, controls: &[QubitId]) -> SelectResult<&mut Self> {
        self.push(Gate::Mcx {
            target,
            controls: controls.to_vec(),
        })
    }

    /// Apply Hadamard on every qubit.
    pub fn h_all(&mut self) -> SelectResult<&mut Self> {
        for q in 0..self.num_qubits as u32 {
            self.h(QubitId(q))?;
        }
        Ok(self)
    }

    /// Apply bit-flip on every qubit.
    pub fn x_all(&mut self) -> SelectResult<&mut Self> {
        for q in 0..self.num_qubits as u32 {
            self.x(QubitId(q))?;
        }
        Ok(self)
    }

    /// Phase flip on the all-ones state: target is the highest qubit, every
    /// other qubit is a control. A one-qubit register gets a plain `Z`.
    pub fn phase_flip_all_ones(&mut self) -> SelectResult<&mut Self> {
        match self.num_qubits {
            0 => Err(SelectError::InvalidQubitCount(0)),
            1 => self.z(QubitId(0)),
            n => {
                let controls: Vec<QubitId> = (0..(n - 1) as u32).map(QubitId).collect();
                self.mcz(QubitId((n - 1) as u32), &controls)
            }
        }
    }

    fn check_qubit(&self, qubit: QubitId) -> SelectResult<()> {
        if qubit.index() >= self.num_qubits {
            return Err(SelectError::QubitOutOfRange {
                qubit: qubit.0,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }
}
