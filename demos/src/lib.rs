//! Demo helpers for the ampsel selector.
//!
//! Console formatting shared by the demo binaries, plus a small tally of
//! repeated selections.

use std::collections::BTreeMap;

use ampsel::{Selection, SelectionPath};
use console::style;
use serde::Serialize;
use tracing::debug;

/// How often each candidate won over a series of trials.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tally {
    /// Wins per candidate index.
    pub wins: BTreeMap<usize, u32>,
    /// Trials that went through the amplified path.
    pub amplified: u32,
    /// Amplified trials whose pick was a marked candidate.
    pub hits: u32,
    /// Total trials recorded.
    pub trials: u32,
}

impl Tally {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one selection.
    pub fn record(&mut self, selection: &Selection) {
        *self.wins.entry(selection.index).or_insert(0) += 1;
        self.trials += 1;
        if let SelectionPath::Amplified { hit, .. } = selection.path {
            self.amplified += 1;
            if hit {
                self.hits += 1;
            }
        }
        debug!(
            trial = self.trials,
            index = selection.index,
            path = %describe_path(&selection.path),
            "selection recorded"
        );
    }

    /// Fraction of amplified trials that landed on a marked candidate.
    pub fn hit_rate(&self) -> Option<f64> {
        (self.amplified > 0).then(|| f64::from(self.hits) / f64::from(self.amplified))
    }

    /// The candidate that won most often; ties go to the lower index.
    pub fn favourite(&self) -> Option<usize> {
        self.wins
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(&index, _)| index)
    }
}

/// Short human-readable name of a selection path.
pub fn describe_path(path: &SelectionPath) -> String {
    match path {
        SelectionPath::Trivial => "trivial".to_string(),
        SelectionPath::Fallback(reason) => format!("fallback ({reason:?})"),
        SelectionPath::Amplified {
            iterations,
            num_qubits,
            ..
        } => format!("amplified ({num_qubits} qubits, {iterations} rounds)"),
    }
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}
