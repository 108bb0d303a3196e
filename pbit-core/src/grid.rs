//! Fixed-size row-major arena for 2-D p-bit state.
//!
//! The counter network stores every counter column as one row of a single
//! rectangular arena. Rows are sized once from the geometry; nothing is padded
//! or reallocated afterwards, so per-row windows are expressed as explicit
//! column bounds instead.

use serde::{Deserialize, Serialize};

/// Dense row-major `rows × cols` matrix of `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid {
    /// All-zero grid.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build a grid from row-major data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), rows * cols, "grid data does not match shape");
        Self { rows, cols, data }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.index(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let idx = self.index(row, col);
        self.data[idx] = value;
    }

    #[inline]
    pub fn add(&mut self, row: usize, col: usize, delta: f64) {
        let idx = self.index(row, col);
        self.data[idx] += delta;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Sum of each row weighted element-wise by `weights` (same shape).
    pub fn weighted_row_sums(&self, weights: &Grid) -> Vec<f64> {
        assert_eq!(
            (self.rows, self.cols),
            (weights.rows, weights.cols),
            "weight grid shape mismatch"
        );
        (0..self.rows)
            .map(|r| {
                self.row(r)
                    .iter()
                    .zip(weights.row(r))
                    .map(|(&s, &w)| s * w)
                    .sum()
            })
            .collect()
    }

    /// Column sums over all rows.
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.cols];
        for r in 0..self.rows {
            for (acc, &v) in sums.iter_mut().zip(self.row(r)) {
                *acc += v;
            }
        }
        sums
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_shape() {
        let g = Grid::zeros(3, 5);
        assert_eq!(g.rows(), 3);
        assert_eq!(g.cols(), 5);
        assert!(g.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_row_major_addressing() {
        let g = Grid::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(g.get(0, 2), 3.0);
        assert_eq!(g.get(1, 0), 4.0);
        assert_eq!(g.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_weighted_row_sums() {
        let g = Grid::from_vec(2, 2, vec![1.0, -1.0, 1.0, 1.0]);
        let w = Grid::from_vec(2, 2, vec![-1.0, 2.0, -1.0, 4.0]);
        assert_eq!(g.weighted_row_sums(&w), vec![-3.0, 3.0]);
    }

    #[test]
    fn test_column_sums() {
        let g = Grid::from_vec(2, 2, vec![1.0, -3.0, 2.0, 0.5]);
        assert_eq!(g.column_sums(), vec![3.0, -2.5]);
    }

    #[test]
    #[should_panic(expected = "grid data does not match shape")]
    fn test_from_vec_rejects_bad_shape() {
        let _ = Grid::from_vec(2, 2, vec![1.0]);
    }
}
