//! Counter-column geometry of an n-bit carry-save multiplier.
//!
//! Product column `k` (`1 ≤ k ≤ n-2`) is one counter row `k-1`. Each row sums
//! its partial products `a_x·b_y` (`x + y = k`) plus the carries routed in from
//! earlier columns and emits `b = ⌈log2(p+c+1)⌉` bits: bit 0 is the product bit
//! of the column, bit `j ≥ 1` is a carry into column `k+j`. Columns 0 and
//! `n-1` are the clamped first/last product bits and have no row.
//!
//! Row layout (`p` partial products, `c` carries in, `b` output bits):
//!
//! ```text
//! | pp 0 .. pp p-1 | carry-in 0 .. c-1 | out 0 (product) | out 1 .. out b-1 (carry-out) | 0 ...
//! ```
//!
//! Carry placement is a greedy left-to-right fill: carry `j` of row `i` takes
//! the next free carry-in slot of row `i+j`, or lands in the overflow pool when
//! row `i+j` does not exist. Every edge points to a later row, so the carry map
//! is a DAG.

use log::debug;
use pbit_core::Grid;
use serde::{Deserialize, Serialize};

use crate::error::{MultiplierError, Result};

/// Smallest supported product width.
pub const MIN_WIDTH: usize = 4;

/// Largest supported product width (products are carried as `u128` and the
/// target range check needs `2^(n+1)`).
pub const MAX_WIDTH: usize = 126;

/// Shape of one counter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterDims {
    /// Partial-product inputs.
    pub partial: usize,
    /// Carry inputs from earlier columns.
    pub carry_in: usize,
    /// Output bits (product bit + carry-outs).
    pub bits: usize,
}

impl CounterDims {
    /// Input cells: partial products followed by carries.
    #[inline]
    pub fn inputs(&self) -> usize {
        self.partial + self.carry_in
    }

    /// Column of this row's product bit.
    #[inline]
    pub fn output_col(&self) -> usize {
        self.inputs()
    }

    /// Cells of the row that may ever be non-zero.
    #[inline]
    pub fn window(&self) -> usize {
        self.inputs() + self.bits
    }

    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.partial, self.carry_in, self.bits)
    }
}

/// One wire of the carry map: carry-out `power` of `source_row` drives the
/// carry-in cell `(target_row, target_col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryEdge {
    pub source_row: usize,
    pub source_col: usize,
    pub power: usize,
    pub target_row: usize,
    pub target_col: usize,
}

/// A carry-out with no downstream counter; reduced by the flat OR pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverflowCell {
    pub row: usize,
    pub col: usize,
    pub power: usize,
}

/// Number of bits needed to count to `x`, i.e. `⌈log2(x+1)⌉`.
#[inline]
pub fn bit_len(x: usize) -> usize {
    (usize::BITS - x.leading_zeros()) as usize
}

/// Immutable wiring of an n-bit counter network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    n: usize,
    dims: Vec<CounterDims>,
    width: usize,
    edges: Vec<CarryEdge>,
    /// `edges[edge_offsets[r]..edge_offsets[r+1]]` leave row `r`.
    edge_offsets: Vec<usize>,
    overflow: Vec<OverflowCell>,
    counter_j: Grid,
    partial_mask: Grid,
}

impl Geometry {
    /// Build the geometry for product width `n`.
    pub fn build(n: usize) -> Result<Self> {
        if n % 2 != 0 {
            return Err(MultiplierError::OddWidth { n });
        }
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&n) {
            return Err(MultiplierError::WidthOutOfRange {
                n,
                min: MIN_WIDTH,
                max: MAX_WIDTH,
            });
        }

        let half = n / 2;
        let rows = n - 2;

        // Partial products per column rise 2..=half then fall half-1..=1.
        let partial: Vec<usize> = (2..=half).chain((1..half).rev()).collect();
        debug_assert_eq!(partial.len(), rows);

        // Ripple: each column's output width adds one carry input to each of
        // the following columns it reaches.
        let mut totals = partial.clone();
        for i in 0..rows {
            let bits = bit_len(totals[i]);
            for j in 1..bits {
                if i + j < rows {
                    totals[i + j] += 1;
                }
            }
        }

        let dims: Vec<CounterDims> = partial
            .iter()
            .zip(&totals)
            .map(|(&p, &t)| CounterDims {
                partial: p,
                carry_in: t - p,
                bits: bit_len(t),
            })
            .collect();

        let width = dims.iter().map(CounterDims::window).max().unwrap_or(0);

        // Greedy carry placement.
        let mut edges = Vec::new();
        let mut edge_offsets = Vec::with_capacity(rows + 1);
        let mut overflow = Vec::new();
        let mut filled = vec![0usize; rows];
        for (i, d) in dims.iter().enumerate() {
            edge_offsets.push(edges.len());
            for j in 1..d.bits {
                let source_col = d.output_col() + j;
                let t = i + j;
                if t < rows {
                    filled[t] += 1;
                    edges.push(CarryEdge {
                        source_row: i,
                        source_col,
                        power: j,
                        target_row: t,
                        target_col: dims[t].partial + filled[t] - 1,
                    });
                } else {
                    overflow.push(OverflowCell {
                        row: i,
                        col: source_col,
                        power: j,
                    });
                }
            }
        }
        edge_offsets.push(edges.len());

        let mut counter_j = Grid::zeros(rows, width);
        let mut partial_mask = Grid::zeros(rows, width);
        for (i, d) in dims.iter().enumerate() {
            let row = counter_j.row_mut(i);
            row[..d.inputs()].fill(-1.0);
            for j in 0..d.bits {
                row[d.inputs() + j] = (1u64 << j) as f64;
            }
            partial_mask.row_mut(i)[..d.partial].fill(1.0);
        }

        debug!(
            "counter geometry n={} rows={} width={} carry_edges={} overflow={}",
            n,
            rows,
            width,
            edges.len(),
            overflow.len()
        );

        Ok(Self {
            n,
            dims,
            width,
            edges,
            edge_offsets,
            overflow,
            counter_j,
            partial_mask,
        })
    }

    /// Product width.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Operand width.
    #[inline]
    pub fn half(&self) -> usize {
        self.n / 2
    }

    /// Number of counter rows (`n - 2`).
    #[inline]
    pub fn rows(&self) -> usize {
        self.dims.len()
    }

    /// Arena width: the widest row window.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn dims(&self) -> &[CounterDims] {
        &self.dims
    }

    /// Every carry edge, ordered by source row.
    pub fn edges(&self) -> &[CarryEdge] {
        &self.edges
    }

    /// Carry edges leaving `row`.
    pub fn edges_from(&self, row: usize) -> &[CarryEdge] {
        &self.edges[self.edge_offsets[row]..self.edge_offsets[row + 1]]
    }

    pub fn overflow(&self) -> &[OverflowCell] {
        &self.overflow
    }

    /// Bit-significance weights: `-1` per input, `2^j` per output bit `j`.
    pub fn counter_j(&self) -> &Grid {
        &self.counter_j
    }

    /// `1.0` on partial-product cells, `0.0` elsewhere.
    pub fn partial_mask(&self) -> &Grid {
        &self.partial_mask
    }

    /// Whether `(row, col)` lies inside the row's live window.
    #[inline]
    pub fn in_window(&self, row: usize, col: usize) -> bool {
        col < self.dims[row].window()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_len() {
        assert_eq!(bit_len(1), 1);
        assert_eq!(bit_len(2), 2);
        assert_eq!(bit_len(3), 2);
        assert_eq!(bit_len(4), 3);
        assert_eq!(bit_len(7), 3);
        assert_eq!(bit_len(8), 4);
    }

    #[test]
    fn test_rejects_odd_width() {
        assert_eq!(Geometry::build(7), Err(MultiplierError::OddWidth { n: 7 }));
    }

    #[test]
    fn test_rejects_width_out_of_range() {
        assert!(matches!(
            Geometry::build(2),
            Err(MultiplierError::WidthOutOfRange { n: 2, .. })
        ));
        assert!(matches!(
            Geometry::build(128),
            Err(MultiplierError::WidthOutOfRange { n: 128, .. })
        ));
    }

    #[test]
    fn test_four_bit_geometry() {
        let g = Geometry::build(4).unwrap();
        assert_eq!(g.rows(), 2);
        let dims: Vec<_> = g.dims().iter().map(CounterDims::as_tuple).collect();
        assert_eq!(dims, vec![(2, 0, 2), (1, 1, 2)]);
        assert_eq!(g.width(), 4);
        assert_eq!(
            g.edges(),
            &[CarryEdge {
                source_row: 0,
                source_col: 3,
                power: 1,
                target_row: 1,
                target_col: 1,
            }]
        );
        assert_eq!(g.overflow(), &[OverflowCell { row: 1, col: 3, power: 1 }]);
    }

    #[test]
    fn test_eight_bit_geometry() {
        let g = Geometry::build(8).unwrap();
        let dims: Vec<_> = g.dims().iter().map(CounterDims::as_tuple).collect();
        assert_eq!(
            dims,
            vec![(2, 0, 2), (3, 1, 3), (4, 1, 3), (3, 2, 3), (2, 2, 3), (1, 2, 2)]
        );
        assert_eq!(g.width(), 8);
        assert_eq!(g.edges().len(), 8);
        assert_eq!(
            g.overflow(),
            &[
                OverflowCell { row: 4, col: 6, power: 2 },
                OverflowCell { row: 5, col: 4, power: 1 },
            ]
        );
        assert_eq!(g.edges_from(2).len(), 2);
        assert_eq!(g.edges_from(5).len(), 0);
    }

    #[test]
    fn test_carry_map_is_acyclic() {
        for n in [4usize, 8, 16, 32, 64] {
            let g = Geometry::build(n).unwrap();
            for e in g.edges() {
                assert!(e.target_row > e.source_row, "n={} edge {:?}", n, e);
                assert_eq!(e.target_row, e.source_row + e.power);
            }
        }
    }

    #[test]
    fn test_every_carry_slot_filled_exactly_once() {
        for n in (4..=64).step_by(2) {
            let g = Geometry::build(n).unwrap();
            let mut incoming = vec![Vec::new(); g.rows()];
            for e in g.edges() {
                incoming[e.target_row].push(e.target_col);
            }
            for (row, cols) in incoming.iter_mut().enumerate() {
                let d = g.dims()[row];
                cols.sort_unstable();
                let expected: Vec<usize> = (d.partial..d.inputs()).collect();
                assert_eq!(cols, &expected, "n={} row={}", n, row);
            }
        }
    }

    #[test]
    fn test_overflow_only_holds_unmappable_carries() {
        for n in [4usize, 8, 16, 32, 64] {
            let g = Geometry::build(n).unwrap();
            for o in g.overflow() {
                assert!(o.row + o.power >= g.rows());
            }
            let carries: usize = g.dims().iter().map(|d| d.bits - 1).sum();
            assert_eq!(carries, g.edges().len() + g.overflow().len());
        }
    }

    #[test]
    fn test_edges_from_partitions_edges() {
        let g = Geometry::build(16).unwrap();
        let mut total = 0;
        for row in 0..g.rows() {
            for e in g.edges_from(row) {
                assert_eq!(e.source_row, row);
            }
            total += g.edges_from(row).len();
        }
        assert_eq!(total, g.edges().len());
    }

    #[test]
    fn test_weights_and_mask() {
        let g = Geometry::build(8).unwrap();
        // row 1: (3, 1, 3) → four inputs at -1, outputs 1, 2, 4, one padding zero
        assert_eq!(g.counter_j().row(1), &[-1.0, -1.0, -1.0, -1.0, 1.0, 2.0, 4.0, 0.0]);
        assert_eq!(g.partial_mask().row(1), &[1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let partial: usize = g.dims().iter().map(|d| d.partial).sum();
        assert_eq!(partial, 15);
    }
}
