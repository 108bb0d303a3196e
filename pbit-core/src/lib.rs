//! # pbit-core
//!
//! Shared primitives for probabilistic-bit circuit simulation.
//!
//! This crate provides:
//! - **Grid**: fixed-size row-major arena sized once from a circuit geometry.
//! - **Layouts**: skewed-index addressing between the counter triangle, the two
//!   rhombus layouts and the operand square.
//! - **Kernels**: tanh squash, bipolar collapse, range clamp, flat OR coupling.
//! - **Adam**: per-group moment estimates for gradient relaxation.
//! - **Random source**: bulk uniform / spin draws over any `rand::Rng`.

pub mod adam;
pub mod grid;
pub mod kernels;
pub mod layout;
pub mod rng;

pub use adam::{AdamConfig, AdamMoments};
pub use grid::Grid;
pub use kernels::{clip_unit, collapse, or_coupling, pbit_sign, squash, squash_in_place};
pub use layout::{Band, ColumnSkew, RowSkew};
pub use rng::SpinSource;
