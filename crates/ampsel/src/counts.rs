//! Measurement histograms.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Outcome counts keyed by basis-state index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    counts: FxHashMap<usize, u64>,
    shots: u64,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `n` occurrences of `outcome`.
    pub fn insert(&mut self, outcome: usize, n: u64) {
        *self.counts.entry(outcome).or_insert(0) += n;
        self.shots += n;
    }

    /// Number of times `outcome` was observed.
    pub fn get(&self, outcome: usize) -> u64 {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// Total number of recorded shots.
    pub fn shots(&self) -> u64 {
        self.shots
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Observed frequency of `outcome`.
    pub fn frequency(&self, outcome: usize) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.get(outcome) as f64 / self.shots as f64
    }

    /// The most frequent outcome; ties go to the lowest index.
    pub fn most_frequent(&self) -> Option<usize> {
        self.counts
            .iter()
            .max_by(|(ia, ca), (ib, cb)| ca.cmp(cb).then(ib.cmp(ia)))
            .map(|(&i, _)| i)
    }

    /// Histogram with every outcome folded onto `outcome % modulus`.
    pub fn fold_modulo(&self, modulus: usize) -> Counts {
        let modulus = modulus.max(1);
        let mut folded = Counts::new();
        for (&outcome, &n) in &self.counts {
            folded.insert(outcome % modulus, n);
        }
        folded
    }

    /// Outcomes sorted by index.
    pub fn sorted(&self) -> Vec<(usize, u64)> {
        let mut v: Vec<_> = self.counts.iter().map(|(&i, &c)| (i, c)).collect();
        v.sort_unstable_by_key(|&(i, _)| i);
        v
    }

    /// Outcomes rendered as bitstrings, most-significant qubit first.
    pub fn to_bitstrings(&self, num_qubits: usize) -> Vec<(String, u64)> {
        self.sorted()
            .into_iter()
            .map(|(i, c)| (format!("{i:0num_qubits$b}"), c))
            .collect()
    }
}
