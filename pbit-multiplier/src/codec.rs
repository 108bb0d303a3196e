//! Bipolar bit arrays ↔ unsigned integers (little-endian, `+1` = set).

use crate::geometry::Geometry;
use crate::state::NetworkState;

/// Decode bipolar states: bit `i` is set iff `states[i] > 0`.
///
/// # Panics
/// If more than 128 states are given.
pub fn decode_bits(states: &[f64]) -> u128 {
    assert!(states.len() <= 128, "cannot decode {} bits into u128", states.len());
    states
        .iter()
        .enumerate()
        .filter(|(_, &s)| s > 0.0)
        .fold(0u128, |acc, (i, _)| acc | (1u128 << i))
}

/// Encode the low `width` bits of `value` as bipolar states.
pub fn encode_bits(value: u128, width: usize) -> Vec<f64> {
    (0..width)
        .map(|i| {
            if i < 128 && (value >> i) & 1 == 1 {
                1.0
            } else {
                -1.0
            }
        })
        .collect()
}

/// Current operands `(A, B)`.
pub fn decode_inputs(state: &NetworkState) -> (u128, u128) {
    (decode_bits(&state.a), decode_bits(&state.b))
}

/// Current product: first bit, each row's product cell, last bit.
pub fn decode_output(geometry: &Geometry, state: &NetworkState) -> u128 {
    let mut bits = Vec::with_capacity(geometry.n());
    bits.push(state.first_bit());
    for (i, d) in geometry.dims().iter().enumerate() {
        bits.push(state.counters.get(i, d.output_col()));
    }
    bits.push(state.last_bit());
    decode_bits(&bits)
}
