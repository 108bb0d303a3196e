//! Annealing driver and factor-search sweep.
//!
//! With the product bits clamped, the network relaxes toward operand pairs
//! whose product is the target. The driver ramps pseudotemperature from soft
//! to sharp and stops as soon as the decoded operands multiply to the clamped
//! product.

use log::info;
use pbit_core::SpinSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::multiplier::CounterMultiplier;
use crate::params::{AnnealParams, EvolutionMode};

/// Seed used for target selection when the params carry none.
const DEFAULT_SWEEP_SEED: u64 = 42;

/// Linear pseudotemperature ramp, held at `end` once `steps` have elapsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSchedule {
    pub start: f64,
    pub end: f64,
    pub steps: usize,
}

impl TemperatureSchedule {
    pub fn new(start: f64, end: f64, steps: usize) -> Self {
        Self { start, end, steps }
    }

    /// Temperature at `iteration` (0-based).
    pub fn at(&self, iteration: usize) -> f64 {
        if self.steps == 0 {
            return self.end;
        }
        let frac = iteration.min(self.steps) as f64 / self.steps as f64;
        self.start + (self.end - self.start) * frac
    }
}

impl From<&AnnealParams> for TemperatureSchedule {
    fn from(p: &AnnealParams) -> Self {
        Self::new(p.start_temperature, p.end_temperature, p.ramp_steps)
    }
}

/// Outcome of one annealing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnealReport {
    /// Iterations actually run.
    pub iterations: usize,
    /// Operands at the end of the run.
    pub inputs: (u128, u128),
    /// Clamped product decoded from the network.
    pub product: u128,
    pub solved: bool,
}

/// Run `multiplier` under `params` until the operands factor the clamped
/// product or `max_iterations` is reached.
pub fn anneal<R: SpinSource>(
    multiplier: &mut CounterMultiplier<R>,
    params: &AnnealParams,
) -> AnnealReport {
    let schedule = TemperatureSchedule::from(params);
    let mut iterations = 0;
    let mut solved = multiplier.is_consistent();

    while !solved && iterations < params.max_iterations {
        multiplier.set_pseudotemperature(schedule.at(iterations));
        match params.mode {
            EvolutionMode::Stochastic => multiplier.stochastic_iteration(),
            EvolutionMode::Deterministic => multiplier.deterministic_iteration(),
        }
        iterations += 1;
        solved = multiplier.is_consistent();
    }

    let report = AnnealReport {
        iterations,
        inputs: multiplier.get_inputs(),
        product: multiplier.get_output(),
        solved,
    };
    info!(
        "anneal n={} product={} mode={} solved={} after {} iterations",
        multiplier.geometry().n(),
        report.product,
        params.mode.name(),
        report.solved,
        report.iterations
    );
    report
}

/// Aggregate over the trials of one (width, target) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub n: usize,
    pub target: u128,
    pub mode: EvolutionMode,
    pub trials: usize,
    pub solved: usize,
    /// Mean iterations over solved trials (0.0 when none solved).
    pub mean_iterations: f64,
}

impl SweepResult {
    pub fn success_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.solved as f64 / self.trials as f64
        }
    }
}

/// Draw `count` factorable targets for width `n`: products of two random
/// `n/2`-bit operands.
pub fn generate_targets(n: usize, count: usize, rng: &mut impl Rng) -> Vec<u128> {
    let bound = 1u128 << (n / 2);
    (0..count)
        .map(|_| rng.gen_range(0..bound) * rng.gen_range(0..bound))
        .collect()
}

/// Anneal every configured width × target × trial.
///
/// Trial `k` of the whole sweep uses seed `base + k`, so the sweep is
/// reproducible from `params.multiplier.seed`.
pub fn run_sweep(params: &AnnealParams) -> Result<Vec<SweepResult>> {
    let base_seed = params.multiplier.seed.unwrap_or(DEFAULT_SWEEP_SEED);
    let mut target_rng = StdRng::seed_from_u64(base_seed);
    let mut trial_seed = base_seed;
    let mut results = Vec::new();

    for &n in &params.widths {
        for target in generate_targets(n, params.targets_per_width, &mut target_rng) {
            let mut solved = 0;
            let mut solved_iterations = 0usize;
            for _ in 0..params.trials {
                let mp = params.multiplier.with_seed(trial_seed);
                trial_seed = trial_seed.wrapping_add(1);
                let mut m = CounterMultiplier::new(n, target, mp)?;
                let report = anneal(&mut m, params);
                if report.solved {
                    solved += 1;
                    solved_iterations += report.iterations;
                }
            }
            results.push(SweepResult {
                n,
                target,
                mode: params.mode,
                trials: params.trials,
                solved,
                mean_iterations: if solved > 0 {
                    solved_iterations as f64 / solved as f64
                } else {
                    0.0
                },
            });
        }
    }

    Ok(results)
}

/// CSV rendering of sweep results with a header row.
pub fn sweep_results_to_csv(results: &[SweepResult]) -> String {
    let mut csv = String::from("n,target,mode,trials,solved,success_rate,mean_iterations\n");
    for r in results {
        csv.push_str(&format!(
            "{},{},{},{},{},{:.4},{:.1}\n",
            r.n,
            r.target,
            r.mode.name(),
            r.trials,
            r.solved,
            r.success_rate(),
            r.mean_iterations,
        ));
    }
    csv
}
