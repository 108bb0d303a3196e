//! Multiplier and annealing configuration.
//!
//! Defaults carry the reference hyper-parameters. Both structs deserialize from
//! JSON with missing fields falling back to the defaults, so a config file only
//! needs the values it overrides.

use pbit_core::AdamConfig;
use serde::{Deserialize, Serialize};

/// Per-instance hyper-parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiplierParams {
    /// Sharpness of the activation squash.
    pub pseudotemperature: f64,
    /// Adam step size.
    pub lr: f64,
    pub beta_1: f64,
    pub beta_2: f64,
    pub epsilon: f64,
    /// Damping of the operand cross term in gradient mode.
    pub and_temp: f64,
    /// Seed for the instance's random source; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for MultiplierParams {
    fn default() -> Self {
        Self {
            pseudotemperature: 1.0,
            lr: 1e-3,
            beta_1: 0.9,
            beta_2: 0.999,
            epsilon: 1e-7,
            and_temp: 1e-1,
            seed: None,
        }
    }
}

impl MultiplierParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn adam(&self) -> AdamConfig {
        AdamConfig {
            lr: self.lr,
            beta_1: self.beta_1,
            beta_2: self.beta_2,
            epsilon: self.epsilon,
        }
    }
}

/// Which evolution rule an annealing run applies each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvolutionMode {
    /// Monte-Carlo sweep: sign-collapse every p-bit.
    Stochastic,
    /// Adam-gradient relaxation over continuous states.
    Deterministic,
}

impl Default for EvolutionMode {
    fn default() -> Self {
        Self::Stochastic
    }
}

impl EvolutionMode {
    pub fn name(&self) -> &'static str {
        match self {
            EvolutionMode::Stochastic => "stochastic",
            EvolutionMode::Deterministic => "deterministic",
        }
    }
}

/// Annealing run / sweep configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealParams {
    pub multiplier: MultiplierParams,
    pub mode: EvolutionMode,
    /// Pseudotemperature at the first iteration.
    pub start_temperature: f64,
    /// Pseudotemperature once the ramp completes.
    pub end_temperature: f64,
    /// Iterations over which the ramp runs.
    pub ramp_steps: usize,
    /// Hard iteration cap per run.
    pub max_iterations: usize,
    /// Bit widths for the sweep runner.
    pub widths: Vec<usize>,
    /// Independent runs per (width, target).
    pub trials: usize,
    /// Targets per width for the sweep runner.
    pub targets_per_width: usize,
}

impl Default for AnnealParams {
    fn default() -> Self {
        Self {
            multiplier: MultiplierParams::default(),
            mode: EvolutionMode::Stochastic,
            start_temperature: 0.1,
            end_temperature: 2.0,
            ramp_steps: 1_000,
            max_iterations: 5_000,
            widths: vec![4, 6, 8],
            trials: 5,
            targets_per_width: 3,
        }
    }
}

impl AnnealParams {
    /// Parse from JSON; absent fields take their defaults.
    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }
}
