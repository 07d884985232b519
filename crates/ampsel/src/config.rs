//! Selector configuration.
//!
//! Supports loading configuration from:
//! 1. YAML files
//! 2. Environment variables (with `AMPSEL_` prefix)
//!
//! Precedence (highest to lowest): environment, file, defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::iterations::{IterationPolicy, RoundingRule};
use crate::statevector::{BYTES_PER_AMPLITUDE, required_bytes};

/// Default amplitude budget: a 20-qubit register.
pub const DEFAULT_MEMORY_BUDGET_BYTES: u64 = 16 * 1024 * 1024;

/// Configuration errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(String),

    /// The configuration file is not valid YAML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Tunables of [`CandidateSelector`](crate::selector::CandidateSelector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Measurement shots per amplified selection. With more than one shot the
    /// most frequent outcome wins.
    pub shots: u32,

    /// Multiplier `k` of the standard deviation in the cut-off `μ ± kσ`.
    pub sigma_multiplier: f64,

    /// Rounding rule for the iteration count.
    pub rounding: RoundingRule,

    /// Fixed cut-off replacing `μ ± kσ` when set.
    pub absolute_threshold: Option<f64>,

    /// Largest amplitude vector, in bytes, the selector will simulate.
    pub memory_budget_bytes: u64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            shots: 1,
            sigma_multiplier: 0.5,
            rounding: RoundingRule::Ceiling,
            absolute_threshold: None,
            memory_budget_bytes: DEFAULT_MEMORY_BUDGET_BYTES,
        }
    }
}

impl SelectorConfig {
    /// Set the number of measurement shots.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Set the standard-deviation multiplier.
    #[must_use]
    pub fn with_sigma_multiplier(mut self, k: f64) -> Self {
        self.sigma_multiplier = k;
        self
    }

    /// Set the iteration rounding rule.
    #[must_use]
    pub fn with_rounding(mut self, rounding: RoundingRule) -> Self {
        self.rounding = rounding;
        self
    }

    /// Use a fixed cut-off instead of the adaptive one.
    #[must_use]
    pub fn with_absolute_threshold(mut self, threshold: f64) -> Self {
        self.absolute_threshold = Some(threshold);
        self
    }

    /// Set the amplitude memory budget.
    #[must_use]
    pub fn with_memory_budget_bytes(mut self, bytes: u64) -> Self {
        self.memory_budget_bytes = bytes;
        self
    }

    /// Iteration policy derived from this configuration.
    pub fn iteration_policy(&self) -> IterationPolicy {
        IterationPolicy::new(self.rounding)
    }

    /// Widest register that fits in the memory budget.
    pub fn max_qubits(&self) -> usize {
        (0..=crate::statevector::MAX_QUBITS)
            .take_while(|&n| required_bytes(n) <= u128::from(self.memory_budget_bytes))
            .last()
            .unwrap_or(0)
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: SelectorConfig =
            serde_yaml_ng::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_yaml_str(&contents)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Merge environment variables into this configuration.
    ///
    /// Only variables that are set and parse override the current values.
    #[must_use]
    pub fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    fn merge_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = var("AMPSEL_SHOTS") {
            if let Ok(val) = v.parse() {
                self.shots = val;
            }
        }
        if let Some(v) = var("AMPSEL_SIGMA_MULTIPLIER") {
            if let Ok(val) = v.parse() {
                self.sigma_multiplier = val;
            }
        }
        if let Some(v) = var("AMPSEL_ROUNDING") {
            if let Ok(val) = v.parse() {
                self.rounding = val;
            }
        }
        if let Some(v) = var("AMPSEL_ABSOLUTE_THRESHOLD") {
            if let Ok(val) = v.parse() {
                self.absolute_threshold = Some(val);
            }
        }
        if let Some(v) = var("AMPSEL_MEMORY_BUDGET_BYTES") {
            if let Ok(val) = v.parse() {
                self.memory_budget_bytes = val;
            }
        }
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shots == 0 {
            return Err(ConfigError::Validation(
                "shots must be greater than 0".to_string(),
            ));
        }
        if !self.sigma_multiplier.is_finite() || self.sigma_multiplier < 0.0 {
            return Err(ConfigError::Validation(format!(
                "sigma_multiplier must be finite and non-negative, got {}",
                self.sigma_multiplier
            )));
        }
        if let Some(t) = self.absolute_threshold {
            if !t.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "absolute_threshold must be finite, got {t}"
                )));
            }
        }
        let one_qubit = 2 * BYTES_PER_AMPLITUDE;
        if u128::from(self.memory_budget_bytes) < one_qubit {
            return Err(ConfigError::Validation(format!(
                "memory_budget_bytes must be at least {one_qubit}, got {}",
                self.memory_budget_bytes
            )));
        }
        Ok(())
    }
}
