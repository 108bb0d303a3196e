//! Local fields of every p-bit group.
//!
//! The network energy is a sum of gate Hamiltonians whose ground states are
//! the AND, counter and OR truth tables. The local field of a p-bit is the
//! energy change of flipping it, collected here per group:
//!
//! | group | gate | field (sampling scale) |
//! |---|---|---|
//! | operand `a_x` | AND inputs | `2·Σ_y pp(x,y) − Σb + n/2` (+`2·first` at x=0) |
//! | operand `b_y` | AND inputs | `2·Σ_x pp(x,y) − Σa + n/2` (+`2·first` at y=0) |
//! | partial product | AND output + counter input | `rows[i] + s + 2(a_x + b_y) − 3` |
//! | carry pair | counter output + counter input | `rows[t] + s − 1 − 2^k(rows[i] − 2^k·s − 1)` |
//! | overflow | OR input + counter output | `(I−11ᵀ)s − 1 − 2^k(rows[i] − 2^k·s − 1) + 2·last` |
//!
//! `rows[i]` is the counter row's weighted sum `Σ_j s_ij · J_ij`.
//!
//! Sampling applies `tanh(T·field)`. The gradient variant halves the gate
//! terms and damps the operand cross term by `and_temp`; the topology is the
//! same.

use pbit_core::{kernels, ColumnSkew, Grid, RowSkew};

use crate::geometry::Geometry;
use crate::state::NetworkState;

/// Local fields for one evaluation, grouped like the state they drive.
#[derive(Debug, Clone, PartialEq)]
pub struct Activations {
    /// Operand A, indexed by bit.
    pub a: Vec<f64>,
    /// Operand B, indexed by bit.
    pub b: Vec<f64>,
    /// Partial-product cells; zero off the partial-product mask.
    pub partial: Grid,
    /// One entry per carry edge, in `Geometry::edges` order.
    pub carry: Vec<f64>,
    /// One entry per overflow cell, in `Geometry::overflow` order.
    pub overflow: Vec<f64>,
}

/// Weighted counter sum of every row.
pub fn row_activations(geometry: &Geometry, state: &NetworkState) -> Vec<f64> {
    state.counters.weighted_row_sums(geometry.counter_j())
}

/// Operand bits `(x, y)` feeding the partial product at `(row, col)`.
///
/// `y` is the column of the cell in the north-west rhombus; `x` is the row
/// that column lands on in the operand square.
#[inline]
pub fn partial_product_operands(geometry: &Geometry, row: usize, col: usize) -> (usize, usize) {
    let half = geometry.half();
    let y = RowSkew::lower(half).physical(row, col, geometry.width());
    let x = ColumnSkew::new(half).square_row(row, y, geometry.rows() + 1);
    debug_assert!(x < half && y < half, "partial product outside the operand square");
    (x, y)
}

/// Fields scaled for stochastic sampling, squashed by `tanh(T·x)`.
pub fn compute_activations(
    geometry: &Geometry,
    state: &NetworkState,
    pseudotemperature: f64,
) -> Activations {
    let mut act = local_fields(geometry, state, 1.0, 1.0);
    kernels::squash_in_place(&mut act.a, pseudotemperature);
    kernels::squash_in_place(&mut act.b, pseudotemperature);
    kernels::squash_in_place(act.partial.as_mut_slice(), pseudotemperature);
    kernels::squash_in_place(&mut act.carry, pseudotemperature);
    kernels::squash_in_place(&mut act.overflow, pseudotemperature);
    act
}

/// Fields scaled for gradient relaxation: gate terms halved, operand cross
/// term damped by `and_temp`, no squash.
pub fn compute_gradients(geometry: &Geometry, state: &NetworkState, and_temp: f64) -> Activations {
    local_fields(geometry, state, 0.5, and_temp)
}

/// Partial-product sums seen by each operand bit, gathered through the two
/// row skews. The upper skew lines A bits up in descending order.
fn operand_products(geometry: &Geometry, counters: &Grid) -> (Vec<f64>, Vec<f64>) {
    let half = geometry.half();
    let width = geometry.width();
    let upper = RowSkew::upper(half);
    let lower = RowSkew::lower(half);
    let mut pp_a = vec![0.0; half];
    let mut pp_b = vec![0.0; half];
    for (i, d) in geometry.dims().iter().enumerate() {
        for j in 0..d.partial {
            let s = counters.get(i, j);
            pp_a[half - 1 - upper.physical(i, j, width)] += s;
            pp_b[lower.physical(i, j, width)] += s;
        }
    }
    (pp_a, pp_b)
}

/// Shared field computation. `scale` multiplies every gate coupling, `cross`
/// additionally damps the operand term of the partial products.
fn local_fields(geometry: &Geometry, state: &NetworkState, scale: f64, cross: f64) -> Activations {
    let half = geometry.half();
    let width = geometry.width();
    let counters = &state.counters;
    let rows = row_activations(geometry, state);
    let (pp_a, pp_b) = operand_products(geometry, counters);

    let sum_a: f64 = state.a.iter().sum();
    let sum_b: f64 = state.b.iter().sum();
    let bias = half as f64;
    let mut a: Vec<f64> = pp_a
        .iter()
        .map(|&p| 2.0 * scale * p - scale * sum_b + bias)
        .collect();
    let mut b: Vec<f64> = pp_b
        .iter()
        .map(|&p| 2.0 * scale * p - scale * sum_a + bias)
        .collect();
    // Column 0 is the AND of a_0 and b_0, clamped to the first product bit.
    a[0] += 2.0 * scale * state.first_bit();
    b[0] += 2.0 * scale * state.first_bit();

    let mut partial = Grid::zeros(geometry.rows(), width);
    for (i, d) in geometry.dims().iter().enumerate() {
        for j in 0..d.partial {
            let (x, y) = partial_product_operands(geometry, i, j);
            let s = counters.get(i, j);
            let and_term = 2.0 * cross * (state.a[x] + state.b[y]);
            partial.set(i, j, scale * (rows[i] + s + and_term) - 3.0);
        }
    }

    let carry_out = |row: usize, power: usize, s: f64| -> f64 {
        let weight = (1u64 << power) as f64;
        weight * (scale * rows[row] - weight * scale * s - 1.0)
    };

    let mut carry = Vec::with_capacity(geometry.edges().len());
    for row in 0..geometry.rows() {
        for e in geometry.edges_from(row) {
            let s = counters.get(e.source_row, e.source_col);
            carry.push(scale * (rows[e.target_row] + s) - 1.0 - carry_out(row, e.power, s));
        }
    }

    let pool: Vec<f64> = geometry
        .overflow()
        .iter()
        .map(|o| counters.get(o.row, o.col))
        .collect();
    let overflow: Vec<f64> = kernels::or_coupling(&pool)
        .iter()
        .zip(geometry.overflow())
        .zip(&pool)
        .map(|((&or, o), &s)| {
            or - 1.0 - carry_out(o.row, o.power, s) + 2.0 * scale * state.last_bit()
        })
        .collect();

    Activations {
        a,
        b,
        partial,
        carry,
        overflow,
    }
}
