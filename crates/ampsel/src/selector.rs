//! Candidate selection by amplitude amplification.
//!
//! One call walks a small state machine:
//!
//! - **trivial**: a single candidate is returned as is.
//! - **thresholding**: scores beyond `μ + kσ` (maximize) or `μ - kσ`
//!   (minimize) are marked.
//! - **fallback**: nothing is marked, or the register would not fit in the
//!   memory budget. The best-scoring candidate is returned.
//! - **amplified**: a Grover run over the marked indices is sampled and the
//!   outcome is reduced modulo the candidate count.
//!
//! Only the amplified path is random.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, warn};

use crate::config::SelectorConfig;
use crate::counts::Counts;
use crate::error::{SelectError, SelectResult};
use crate::iterations::{register_width, search_space_size};
use crate::runner::GroverRunner;

/// Whether high or low scores are preferred.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Prefer high scores.
    #[default]
    Maximize,
    /// Prefer low scores.
    Minimize,
}

impl Direction {
    /// Whether `a` is strictly better than `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Direction::Maximize => a > b,
            Direction::Minimize => a < b,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Maximize => f.write_str("maximize"),
            Direction::Minimize => f.write_str("minimize"),
        }
    }
}

/// Outcome of the thresholding step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    /// Mean score.
    pub mean: f64,
    /// Population standard deviation of the scores.
    pub std_dev: f64,
    /// Score a candidate must strictly beat to be marked.
    pub cutoff: f64,
    /// Indices of marked candidates, ascending.
    pub marked: Vec<usize>,
}

/// Why the selector skipped the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No candidate passed the cut-off.
    NoMarkedCandidates,
    /// The register would exceed the memory budget.
    SimulationOverflow,
}

/// Which branch produced a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPath {
    /// Exactly one candidate.
    Trivial,
    /// Direct arg-max / arg-min.
    Fallback(FallbackReason),
    /// Sampled from a Grover run.
    Amplified {
        /// Oracle + diffusion rounds applied.
        iterations: usize,
        /// Register width.
        num_qubits: usize,
        /// Most frequent basis state behind the chosen candidate, before the
        /// modulo reduction.
        sampled: usize,
        /// Whether the chosen candidate was in the marked set.
        hit: bool,
    },
}

/// A selected candidate index with the path that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Index into the caller's candidate list.
    pub index: usize,
    /// Branch taken.
    pub path: SelectionPath,
    /// Thresholding details; absent for the trivial path.
    pub threshold: Option<Threshold>,
}

impl Selection {
    /// Whether the result did not depend on randomness.
    pub fn is_deterministic(&self) -> bool {
        !matches!(self.path, SelectionPath::Amplified { .. })
    }
}

/// Picks one candidate from a scored list.
///
/// The selector holds only configuration, so one instance can serve many
/// threads. Callers running in parallel should hand each call its own RNG.
#[derive(Debug, Clone, Default)]
pub struct CandidateSelector {
    config: SelectorConfig,
}

impl CandidateSelector {
    /// Create a selector after validating `config`.
    pub fn new(config: SelectorConfig) -> SelectResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Select a candidate using the thread-local RNG.
    pub fn select<'a, T>(
        &self,
        candidates: &'a [T],
        scores: &[f64],
        direction: Direction,
    ) -> SelectResult<(&'a T, Selection)> {
        self.select_with_rng(candidates, scores, direction, &mut rand::thread_rng())
    }

    /// Select a candidate, drawing measurement randomness from `rng`.
    pub fn select_with_rng<'a, T, R: Rng + ?Sized>(
        &self,
        candidates: &'a [T],
        scores: &[f64],
        direction: Direction,
        rng: &mut R,
    ) -> SelectResult<(&'a T, Selection)> {
        if candidates.is_empty() {
            return Err(SelectError::EmptyCandidateSet);
        }
        if candidates.len() != scores.len() {
            return Err(SelectError::LengthMismatch {
                candidates: candidates.len(),
                scores: scores.len(),
            });
        }
        let selection = self.select_index_with_rng(scores, direction, rng)?;
        Ok((&candidates[selection.index], selection))
    }

    /// Select an index using the thread-local RNG.
    pub fn select_index(&self, scores: &[f64], direction: Direction) -> SelectResult<Selection> {
        self.select_index_with_rng(scores, direction, &mut rand::thread_rng())
    }

    /// Select an index into `scores`, drawing measurement randomness from `rng`.
    #[instrument(skip(self, scores, rng), fields(candidates = scores.len()))]
    pub fn select_index_with_rng<R: Rng + ?Sized>(
        &self,
        scores: &[f64],
        direction: Direction,
        rng: &mut R,
    ) -> SelectResult<Selection> {
        validate_scores(scores)?;
        let count = scores.len();

        if count == 1 {
            debug!("single candidate, no simulation");
            return Ok(Selection {
                index: 0,
                path: SelectionPath::Trivial,
                threshold: None,
            });
        }

        let threshold = self.compute_threshold(scores, direction);
        debug!(
            mean = threshold.mean,
            std_dev = threshold.std_dev,
            cutoff = threshold.cutoff,
            marked = threshold.marked.len(),
            "thresholded scores"
        );

        if threshold.marked.is_empty() {
            return Ok(self.fallback(
                scores,
                direction,
                threshold,
                FallbackReason::NoMarkedCandidates,
            ));
        }

        let num_qubits = register_width(count);
        let policy = self.config.iteration_policy();
        let runner = GroverRunner::new(num_qubits, &threshold.marked, &policy)
            .and_then(|r| r.with_memory_budget(self.config.memory_budget_bytes));
        let runner = match runner {
            Ok(runner) => runner,
            Err(SelectError::SimulationOverflow {
                num_qubits,
                required_bytes,
                budget_bytes,
            }) => {
                warn!(
                    num_qubits,
                    required_bytes = %required_bytes,
                    budget_bytes = %budget_bytes,
                    "register too large, selecting best score directly"
                );
                return Ok(self.fallback(
                    scores,
                    direction,
                    threshold,
                    FallbackReason::SimulationOverflow,
                ));
            }
            Err(e) => return Err(e),
        };

        let outcome = runner.run_with_rng(self.config.shots, rng)?;
        let (index, sampled) = fold_outcome(&outcome.counts, count)
            .unwrap_or((outcome.index % count, outcome.index));
        let hit = threshold.marked.binary_search(&index).is_ok();
        debug!(
            search_space = search_space_size(count),
            sampled,
            index,
            hit,
            "amplified selection"
        );

        Ok(Selection {
            index,
            path: SelectionPath::Amplified {
                iterations: outcome.iterations,
                num_qubits,
                sampled,
                hit,
            },
            threshold: Some(threshold),
        })
    }

    /// Thresholding step on its own: statistics, cut-off and marked set.
    pub fn threshold(&self, scores: &[f64], direction: Direction) -> SelectResult<Threshold> {
        if scores.is_empty() {
            return Err(SelectError::EmptyCandidateSet);
        }
        validate_scores(scores)?;
        Ok(self.compute_threshold(scores, direction))
    }

    fn compute_threshold(&self, scores: &[f64], direction: Direction) -> Threshold {
        let (mean, std_dev) = mean_and_std_dev(scores);
        let cutoff = match self.config.absolute_threshold {
            Some(t) => t,
            None => {
                let offset = self.config.sigma_multiplier * std_dev;
                match direction {
                    Direction::Maximize => mean + offset,
                    Direction::Minimize => mean - offset,
                }
            }
        };

        let marked = if cutoff.is_finite() {
            scores
                .iter()
                .enumerate()
                .filter(|&(_, &s)| direction.is_better(s, cutoff))
                .map(|(i, _)| i)
                .collect()
        } else {
            Vec::new()
        };

        Threshold {
            mean,
            std_dev,
            cutoff,
            marked,
        }
    }

    fn fallback(
        &self,
        scores: &[f64],
        direction: Direction,
        threshold: Threshold,
        reason: FallbackReason,
    ) -> Selection {
        let index = best_index(scores, direction);
        debug!(index, ?reason, "fallback selection");
        Selection {
            index,
            path: SelectionPath::Fallback(reason),
            threshold: Some(threshold),
        }
    }
}

fn validate_scores(scores: &[f64]) -> SelectResult<()> {
    if scores.is_empty() {
        return Err(SelectError::EmptyCandidateSet);
    }
    if let Some((index, &value)) = scores.iter().enumerate().find(|(_, s)| !s.is_finite()) {
        return Err(SelectError::InvalidScore { index, value });
    }
    Ok(())
}

/// Mode over candidate indices once padded outcomes are folded onto
/// `outcome % count`, plus the most frequent raw outcome behind it.
fn fold_outcome(counts: &Counts, count: usize) -> Option<(usize, usize)> {
    let index = counts.fold_modulo(count).most_frequent()?;
    let sampled = counts
        .sorted()
        .into_iter()
        .filter(|&(raw, _)| raw % count == index)
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(raw, _)| raw)?;
    Some((index, sampled))
}

/// Index of the best score; the first one wins ties.
fn best_index(scores: &[f64], direction: Direction) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if direction.is_better(s, scores[best]) {
            best = i;
        }
    }
    best
}

/// Mean and population standard deviation.
fn mean_and_std_dev(scores: &[f64]) -> (f64, f64) {
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
