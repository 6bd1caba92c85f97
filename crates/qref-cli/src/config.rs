//! Display configuration for the qref CLI.
//!
//! Supports loading configuration from:
//! 1. A YAML file passed with `--config`
//! 2. Environment variables (with QREF_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How numbers and samples are presented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Decimal places for amplitudes, probabilities and matrix entries.
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Tolerance for unitarity and normalization checks.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Draw circuits with the highest qubit on top.
    #[serde(default)]
    pub reverse_bits: bool,

    /// Default number of shots when sampling.
    #[serde(default = "default_shots")]
    pub shots: usize,

    /// Sampling seed; unseeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_precision() -> usize {
    3
}

fn default_tolerance() -> f64 {
    1e-10
}

fn default_shots() -> usize {
    1024
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            tolerance: default_tolerance(),
            reverse_bits: false,
            shots: default_shots(),
            seed: None,
        }
    }
}

impl DisplayConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn from_yaml(contents: &str) -> Result<Self> {
        let config: DisplayConfig = serde_yaml_ng::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// File (or defaults), then environment overrides.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env(|key| std::env::var(key).ok());
        config.validate()?;
        debug!(?config, "loaded display configuration");
        Ok(config)
    }

    /// Override fields whose variables are set. Unparseable values are
    /// ignored.
    fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = lookup("QREF_PRECISION").and_then(|v| v.parse().ok()) {
            self.precision = val;
        }
        if let Some(val) = lookup("QREF_TOLERANCE").and_then(|v| v.parse().ok()) {
            self.tolerance = val;
        }
        if let Some(val) = lookup("QREF_REVERSE_BITS").and_then(|v| parse_bool(&v)) {
            self.reverse_bits = val;
        }
        if let Some(val) = lookup("QREF_SHOTS").and_then(|v| v.parse().ok()) {
            self.shots = val;
        }
        if let Some(val) = lookup("QREF_SEED").and_then(|v| v.parse().ok()) {
            self.seed = Some(val);
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.precision > 15 {
            anyhow::bail!("precision must be at most 15, got {}", self.precision);
        }
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            anyhow::bail!("tolerance must be positive, got {}", self.tolerance);
        }
        if self.shots == 0 {
            anyhow::bail!("shots must be at least 1");
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
