//! Skewed-index layouts for the counter triangle.
//!
//! The counter arena stores one row per internal product column, valid cells
//! left-aligned ("right isosceles" triangle). Operand-local and column-local
//! sums line up only after each row is rotated by a row-dependent offset:
//!
//! - **Upper skew** (triangle ↔ north-east rhombus): rows `i < half-2` rotate
//!   right by `half-2-i`. Column `j` of the result collects every partial
//!   product of operand-A bit `half-1-j`.
//! - **Lower skew** (triangle ↔ north-west rhombus): rows `i >= half-2` rotate
//!   right by `i-(half-2)`. Column `j` of the result collects every partial
//!   product of operand-B bit `j`.
//! - **Column skew** (north-west rhombus ↔ square): a zero row is prepended and
//!   column `j < half` rotates up by `j`, so row `x` of the square holds the
//!   partial products of operand-A bit `x`.
//!
//! Each skew is one offset function from a logical `(row, col)` to a physical
//! column (or row). The materialised `push`/`pull` forms exist for callers that
//! want the rotated array; the activation engine addresses through the offsets
//! directly.

use crate::grid::Grid;

/// Which band of rows a row skew rotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Rows above the widest column (`i < half-2`).
    Upper,
    /// The widest column and every row below it (`i >= half-2`).
    Lower,
}

/// Row-wise circular skew of an `R × W` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSkew {
    band: Band,
    half: usize,
}

impl RowSkew {
    /// Triangle → north-east rhombus.
    pub fn upper(half: usize) -> Self {
        Self {
            band: Band::Upper,
            half,
        }
    }

    /// Triangle → north-west rhombus.
    pub fn lower(half: usize) -> Self {
        Self {
            band: Band::Lower,
            half,
        }
    }

    #[inline]
    pub fn band(&self) -> Band {
        self.band
    }

    /// Row of the widest counter column.
    #[inline(always)]
    fn pivot(&self) -> usize {
        self.half.saturating_sub(2)
    }

    /// Right-rotation applied to `row`.
    #[inline(always)]
    pub fn offset(&self, row: usize) -> usize {
        let pivot = self.pivot();
        match self.band {
            Band::Upper if row < pivot => pivot - row,
            Band::Lower if row >= pivot => row - pivot,
            _ => 0,
        }
    }

    /// Physical column of logical `(row, col)` in a row of `width` cells.
    #[inline(always)]
    pub fn physical(&self, row: usize, col: usize, width: usize) -> usize {
        (col + self.offset(row)) % width
    }

    /// Rotate every row of `grid` into the skewed layout.
    pub fn push(&self, grid: &Grid) -> Grid {
        let width = grid.cols();
        let mut out = Grid::zeros(grid.rows(), width);
        if width == 0 {
            return out;
        }
        for r in 0..grid.rows() {
            let src = grid.row(r);
            let dst = out.row_mut(r);
            for (c, &v) in src.iter().enumerate() {
                dst[self.physical(r, c, width)] = v;
            }
        }
        out
    }

    /// Inverse of [`RowSkew::push`].
    pub fn pull(&self, grid: &Grid) -> Grid {
        let width = grid.cols();
        let mut out = Grid::zeros(grid.rows(), width);
        if width == 0 {
            return out;
        }
        for r in 0..grid.rows() {
            let src = grid.row(r);
            let dst = out.row_mut(r);
            for (c, slot) in dst.iter_mut().enumerate() {
                *slot = src[self.physical(r, c, width)];
            }
        }
        out
    }
}

/// Column-wise skew between the north-west rhombus and the operand square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSkew {
    half: usize,
}

impl ColumnSkew {
    pub fn new(half: usize) -> Self {
        Self { half }
    }

    /// Square row holding rhombus cell `(row, col)` when the square is
    /// `height` rows tall (rhombus rows + 1).
    #[inline(always)]
    pub fn square_row(&self, row: usize, col: usize, height: usize) -> usize {
        let shift = if col < self.half { col % height } else { 0 };
        (row + 1 + height - shift) % height
    }

    /// Prepend a zero row and rotate column `j < half` up by `j`.
    pub fn rhombus_to_square(&self, grid: &Grid) -> Grid {
        let height = grid.rows() + 1;
        let mut out = Grid::zeros(height, grid.cols());
        for r in 0..grid.rows() {
            for c in 0..grid.cols() {
                out.set(self.square_row(r, c, height), c, grid.get(r, c));
            }
        }
        out
    }

    /// Inverse of [`ColumnSkew::rhombus_to_square`]; drops the leading row.
    ///
    /// # Panics
    /// If `grid` has no rows.
    pub fn square_to_rhombus(&self, grid: &Grid) -> Grid {
        let height = grid.rows();
        assert!(height > 0, "square layout needs at least one row");
        let mut out = Grid::zeros(height - 1, grid.cols());
        for r in 0..height - 1 {
            for c in 0..grid.cols() {
                out.set(r, c, grid.get(self.square_row(r, c, height), c));
            }
        }
        out
    }
}
