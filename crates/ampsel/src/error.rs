//! Error types for the selector crate.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced by candidate selection and the underlying simulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SelectError {
    /// No candidates were supplied.
    #[error("candidate set is empty, nothing to select from")]
    EmptyCandidateSet,

    /// Candidate and score lists have different lengths.
    #[error("{candidates} candidates but {scores} scores")]
    LengthMismatch {
        /// Number of candidates supplied.
        candidates: usize,
        /// Number of scores supplied.
        scores: usize,
    },

    /// A score is NaN or infinite.
    #[error("score at index {index} is not finite: {value}")]
    InvalidScore {
        /// Position of the offending score.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// The amplitude vector would not fit in the configured memory budget.
    #[error(
        "simulating {num_qubits} qubits needs {required_bytes} bytes, budget is {budget_bytes}"
    )]
    SimulationOverflow {
        /// Register width that was requested.
        num_qubits: usize,
        /// Bytes the amplitude vector would occupy.
        required_bytes: u128,
        /// Configured budget in bytes.
        budget_bytes: u128,
    },

    /// A register must have at least one qubit.
    #[error("register needs at least 1 qubit, got {0}")]
    InvalidQubitCount(usize),

    /// A gate references a qubit outside the register.
    #[error("qubit {qubit} out of range for a {num_qubits}-qubit register")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: u32,
        /// Register width.
        num_qubits: usize,
    },

    /// A marked basis state lies outside the search space.
    #[error("basis state {index} out of range for a search space of {size}")]
    IndexOutOfRange {
        /// The offending basis-state index.
        index: usize,
        /// Size of the search space.
        size: usize,
    },

    /// Amplification was requested with an empty marked set.
    #[error("no marked states, amplification is undefined")]
    NoMarkedStates,

    /// At least one measurement shot is required.
    #[error("shots must be at least 1, got {0}")]
    InvalidShots(u32),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for selection and simulation operations.
pub type SelectResult<T> = Result<T, SelectError>;
