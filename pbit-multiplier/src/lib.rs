//! # pbit-multiplier
//!
//! Invertible n-bit multiplier built from probabilistic bits.
//!
//! An `n`-bit product is laid out as a carry-save array of AND gates feeding
//! parallel counters, whose carries ripple to later product bits and whose
//! overflow collapses into a single OR gate on the top product bit. The product
//! bits are clamped to a target; the operand bits are free. Run backwards, the
//! network relaxes toward operand pairs that factor the target.
//!
//! Two evolution rules share the same local fields:
//!
//! 1. **Stochastic**: every free p-bit is resampled as `sign(u + tanh(T·h))`.
//! 2. **Deterministic**: states are continuous in `[-1, 1]` and follow Adam
//!    ascent on the gradient-scale fields.
//!
//! [`anneal`] ramps pseudotemperature over repeated iterations until the
//! operands multiply to the clamped product; [`run_sweep`] repeats that over
//! widths, targets and seeds.

pub mod activation;
pub mod anneal;
pub mod codec;
pub mod error;
pub mod evolution;
pub mod geometry;
pub mod multiplier;
pub mod params;
pub mod state;

pub use activation::{
    compute_activations, compute_gradients, partial_product_operands, row_activations, Activations,
};
pub use anneal::{
    anneal, generate_targets, run_sweep, sweep_results_to_csv, AnnealReport, SweepResult,
    TemperatureSchedule,
};
pub use codec::{decode_bits, decode_inputs, decode_output, encode_bits};
pub use error::{MultiplierError, Result};
pub use evolution::{descent, sample, OptimizerState};
pub use geometry::{bit_len, CarryEdge, CounterDims, Geometry, OverflowCell, MAX_WIDTH, MIN_WIDTH};
pub use multiplier::CounterMultiplier;
pub use params::{AnnealParams, EvolutionMode, MultiplierParams};
pub use state::NetworkState;
