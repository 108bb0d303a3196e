//! State updates: Monte-Carlo sweep and Adam relaxation.
//!
//! Both rules write the counter arena in the same three passes:
//!
//! 1. partial-product cells (null-and-replace under the mask),
//! 2. carry pairs: source and target cell receive the same value,
//! 3. overflow cells.
//!
//! Every field is computed from the pre-update state before the first write,
//! so a sweep is synchronous.

use pbit_core::{kernels, AdamConfig, AdamMoments, SpinSource};
use serde::{Deserialize, Serialize};

use crate::activation::Activations;
use crate::geometry::Geometry;
use crate::state::NetworkState;

/// Adam moments for the five activation groups plus the shared timestep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizerState {
    pub timestep: u64,
    pub a: AdamMoments,
    pub b: AdamMoments,
    /// Sized to the whole counter arena; only masked cells ever move.
    pub partial: AdamMoments,
    pub carry: AdamMoments,
    pub overflow: AdamMoments,
}

impl OptimizerState {
    /// Zeroed moments sized for `geometry`.
    pub fn new(geometry: &Geometry) -> Self {
        Self {
            timestep: 0,
            a: AdamMoments::zeros(geometry.half()),
            b: AdamMoments::zeros(geometry.half()),
            partial: AdamMoments::zeros(geometry.rows() * geometry.width()),
            carry: AdamMoments::zeros(geometry.edges().len()),
            overflow: AdamMoments::zeros(geometry.overflow().len()),
        }
    }
}

/// One Monte-Carlo sweep: every free p-bit becomes `sign(u + activation)`.
pub fn sample<R: SpinSource + ?Sized>(
    geometry: &Geometry,
    state: &mut NetworkState,
    act: &Activations,
    rng: &mut R,
) {
    let r_a = rng.uniform(-1.0, 1.0, act.a.len());
    let r_b = rng.uniform(-1.0, 1.0, act.b.len());
    let r_partial = rng.uniform(-1.0, 1.0, act.partial.as_slice().len());
    let r_carry = rng.uniform(-1.0, 1.0, act.carry.len());
    let r_overflow = rng.uniform(-1.0, 1.0, act.overflow.len());

    state.a = kernels::collapse(&r_a, &act.a);
    state.b = kernels::collapse(&r_b, &act.b);

    let width = geometry.width();
    for (i, d) in geometry.dims().iter().enumerate() {
        for j in 0..d.partial {
            let k = i * width + j;
            state
                .counters
                .set(i, j, kernels::pbit_sign(r_partial[k] + act.partial.get(i, j)));
        }
    }

    let carry = kernels::collapse(&r_carry, &act.carry);
    for (e, &v) in geometry.edges().iter().zip(&carry) {
        state.counters.set(e.source_row, e.source_col, v);
        state.counters.set(e.target_row, e.target_col, v);
    }

    let overflow = kernels::collapse(&r_overflow, &act.overflow);
    for (o, &v) in geometry.overflow().iter().zip(&overflow) {
        state.counters.set(o.row, o.col, v);
    }
}

/// One Adam ascent step on `grads`, then clip every state array to `[-1, 1]`.
///
/// Operands and carry/overflow cells move by the Adam step; partial-product
/// cells are replaced by it. Takes the optimizer state by value and returns
/// the advanced state.
pub fn descent(
    geometry: &Geometry,
    state: &mut NetworkState,
    grads: &Activations,
    mut opt: OptimizerState,
    cfg: &AdamConfig,
) -> OptimizerState {
    opt.timestep += 1;
    let t = opt.timestep;

    let step_a = opt.a.step(&grads.a, t, cfg);
    let step_b = opt.b.step(&grads.b, t, cfg);
    let step_partial = opt.partial.step(grads.partial.as_slice(), t, cfg);
    let step_carry = opt.carry.step(&grads.carry, t, cfg);
    let step_overflow = opt.overflow.step(&grads.overflow, t, cfg);

    for (v, d) in state.a.iter_mut().zip(&step_a) {
        *v += d;
    }
    for (v, d) in state.b.iter_mut().zip(&step_b) {
        *v += d;
    }

    let width = geometry.width();
    for (i, d) in geometry.dims().iter().enumerate() {
        for j in 0..d.partial {
            state.counters.set(i, j, step_partial[i * width + j]);
        }
    }

    for (e, &d) in geometry.edges().iter().zip(&step_carry) {
        state.counters.add(e.source_row, e.source_col, d);
        state.counters.add(e.target_row, e.target_col, d);
    }

    for (o, &d) in geometry.overflow().iter().zip(&step_overflow) {
        state.counters.add(o.row, o.col, d);
    }

    kernels::clip_unit(&mut state.a);
    kernels::clip_unit(&mut state.b);
    kernels::clip_unit(state.counters.as_mut_slice());

    opt
}
