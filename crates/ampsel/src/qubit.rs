//! Qubit identifiers.
//!
//! Qubit `q` addresses bit `q` of a basis-state index, so qubit 0 is the
//! least-significant bit. The oracle and the measurement decoding both rely on
//! this mapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a qubit within the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// Bit mask selecting this qubit in a basis-state index.
    pub fn mask(self) -> usize {
        1 << self.0
    }

    /// Index of this qubit as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitId(0)), "q0");
        assert_eq!(format!("{}", QubitId(7)), "q7");
    }

    #[test]
    fn test_qubit_mask() {
        assert_eq!(QubitId(0).mask(), 0b001);
        assert_eq!(QubitId(2).mask(), 0b100);
    }
}
