//! `ampsel` picks one candidate from a scored list by simulating Grover's
//! amplitude amplification instead of taking a plain arg-max.
//!
//! Candidates whose score lies beyond an adaptive cut-off (`μ ± kσ`) are
//! marked. A small statevector simulation then runs oracle + diffusion rounds
//! over the padded power-of-two search space and samples one basis state,
//! which is mapped back onto the candidate list. When nothing is marked the
//! best-scoring candidate is returned directly.
//!
//! # Quick start
//!
//! ```rust
//! use ampsel::{CandidateSelector, Direction};
//! use rand::SeedableRng;
//!
//! let moves = ["e4", "d4", "c4", "Nf3", "g3"];
//! let scores = [0.3, 0.1, 0.2, 2.5, 0.0];
//!
//! let selector = CandidateSelector::default();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let (chosen, selection) = selector
//!     .select_with_rng(&moves, &scores, Direction::Maximize, &mut rng)
//!     .unwrap();
//! assert!(moves.contains(chosen));
//! assert!(selection.index < moves.len());
//! ```
//!
//! # Memory
//!
//! | Candidates | Qubits | Amplitude vector |
//! |------------|--------|------------------|
//! | 1 024 | 10 | 16 KB |
//! | 32 768 | 15 | 512 KB |
//! | 1 048 576 | 20 | 16 MB |
//!
//! Larger sets exceed the default budget and are resolved by direct
//! arg-max / arg-min.

pub mod config;
pub mod counts;
pub mod diffusion;
pub mod error;
pub mod gate;
pub mod iterations;
pub mod oracle;
pub mod qubit;
pub mod runner;
pub mod selector;
pub mod statevector;

pub use config::{ConfigError, SelectorConfig};
pub use counts::Counts;
pub use diffusion::Diffusion;
pub use error::{SelectError, SelectResult};
pub use gate::{Gate, GateSequence};
pub use iterations::{
    IterationPolicy, RoundingRule, register_width, search_space_size, success_probability,
};
pub use oracle::Oracle;
pub use qubit::QubitId;
pub use runner::{GroverOutcome, GroverRunner};
pub use selector::{
    CandidateSelector, Direction, FallbackReason, Selection, SelectionPath, Threshold,
};
pub use statevector::{MAX_QUBITS, StateVector};
