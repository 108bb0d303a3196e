//! Mutable p-bit state of one multiplier instance.

use pbit_core::{Grid, SpinSource};
use serde::{Deserialize, Serialize};

use crate::codec::encode_bits;
use crate::geometry::Geometry;

/// Operands, counter arena and the two clamped product bits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkState {
    /// Operand A, little-endian, bipolar.
    pub a: Vec<f64>,
    /// Operand B, little-endian, bipolar.
    pub b: Vec<f64>,
    /// Counter arena, `rows × width`.
    pub counters: Grid,
    first_bit: f64,
    last_bit: f64,
}

impl NetworkState {
    /// Random initial state for `geometry`, clamped to `output`.
    ///
    /// The first `n - 1` product bits take the low bits of `output`. The last
    /// product bit is bit `n - 1`, or `+1` when `output` needs more than `n`
    /// bits.
    ///
    /// Operands and every live counter cell start as random spins. Each row's
    /// product cell is then clamped to its target bit and every carry-in cell
    /// takes the value of the carry-out driving it, so fan-out pairs agree from
    /// the first sweep on.
    pub fn seeded<R: SpinSource + ?Sized>(geometry: &Geometry, output: u128, rng: &mut R) -> Self {
        let half = geometry.half();
        let target = encode_bits(output, geometry.n());

        let a = rng.spins(half);
        let b = rng.spins(half);

        let mut counters = Grid::zeros(geometry.rows(), geometry.width());
        for (i, d) in geometry.dims().iter().enumerate() {
            let seed = rng.spins(d.window());
            let row = counters.row_mut(i);
            row[..d.window()].copy_from_slice(&seed);
            row[d.output_col()] = target[i + 1];
        }
        for e in geometry.edges() {
            let v = counters.get(e.source_row, e.source_col);
            counters.set(e.target_row, e.target_col, v);
        }

        // A target wider than n bits clamps its top set bit onto the last
        // product bit.
        let last_bit = if output >> geometry.n() != 0 {
            1.0
        } else {
            target[geometry.n() - 1]
        };

        Self {
            a,
            b,
            counters,
            first_bit: target[0],
            last_bit,
        }
    }

    /// Clamped least-significant product bit.
    #[inline]
    pub fn first_bit(&self) -> f64 {
        self.first_bit
    }

    /// Clamped most-significant product bit.
    #[inline]
    pub fn last_bit(&self) -> f64 {
        self.last_bit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_seeded_state_clamps_product_bits() {
        let g = Geometry::build(8).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        // 0b1011_0110
        let s = NetworkState::seeded(&g, 182, &mut rng);
        assert_eq!(s.first_bit(), -1.0);
        assert_eq!(s.last_bit(), 1.0);
        let expected = [1.0, 1.0, -1.0, 1.0, 1.0, -1.0];
        for (i, d) in g.dims().iter().enumerate() {
            assert_eq!(s.counters.get(i, d.output_col()), expected[i], "row {}", i);
        }
    }

    #[test]
    fn test_wide_target_sets_last_bit() {
        let g = Geometry::build(4).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        for (output, first, cells) in [
            (16u128, -1.0, [-1.0, -1.0]),
            (32, -1.0, [-1.0, -1.0]),
            (0b1_0110, -1.0, [1.0, 1.0]),
            (0b1_0001, 1.0, [-1.0, -1.0]),
        ] {
            let s = NetworkState::seeded(&g, output, &mut rng);
            assert_eq!(s.first_bit(), first, "output {:#b}", output);
            assert_eq!(s.last_bit(), 1.0, "output {:#b}", output);
            for (i, d) in g.dims().iter().enumerate() {
                assert_eq!(s.counters.get(i, d.output_col()), cells[i]);
            }
        }
        // bit n-1 clear and nothing above it
        let s = NetworkState::seeded(&g, 0b0111, &mut rng);
        assert_eq!(s.last_bit(), -1.0);
    }

    #[test]
    fn test_seeded_state_is_bipolar_inside_window_and_zero_outside() {
        let g = Geometry::build(16).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let s = NetworkState::seeded(&g, 12345, &mut rng);
        for row in 0..g.rows() {
            for col in 0..g.width() {
                let v = s.counters.get(row, col);
                if g.in_window(row, col) {
                    assert!(v == 1.0 || v == -1.0);
                } else {
                    assert_eq!(v, 0.0);
                }
            }
        }
        assert!(s.a.iter().chain(&s.b).all(|&v| v == 1.0 || v == -1.0));
    }

    #[test]
    fn test_seeded_state_ties_fan_out_pairs() {
        let g = Geometry::build(32).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let s = NetworkState::seeded(&g, 0, &mut rng);
        for e in g.edges() {
            assert_eq!(
                s.counters.get(e.source_row, e.source_col),
                s.counters.get(e.target_row, e.target_col)
            );
        }
    }
}
