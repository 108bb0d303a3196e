//! Random source for p-bit sampling.
//!
//! Every `rand::Rng` is a [`SpinSource`]; seed a `StdRng` for reproducible
//! trajectories.

use rand::Rng;

/// Uniform reals and bipolar spins, drawn in bulk.
pub trait SpinSource {
    /// `len` independent uniform draws from `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64, len: usize) -> Vec<f64>;

    /// `len` independent fair draws from `{-1, +1}`.
    fn spins(&mut self, len: usize) -> Vec<f64>;
}

impl<R: Rng + ?Sized> SpinSource for R {
    fn uniform(&mut self, lo: f64, hi: f64, len: usize) -> Vec<f64> {
        (0..len).map(|_| self.gen_range(lo..hi)).collect()
    }

    fn spins(&mut self, len: usize) -> Vec<f64> {
        (0..len)
            .map(|_| if self.gen_bool(0.5) { 1.0 } else { -1.0 })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let draws = rng.uniform(-1.0, 1.0, 1000);
        assert_eq!(draws.len(), 1000);
        assert!(draws.iter().all(|&v| (-1.0..1.0).contains(&v)));
        let mean: f64 = draws.iter().sum::<f64>() / draws.len() as f64;
        assert!(mean.abs() < 0.1, "mean {} too far from zero", mean);
    }

    #[test]
    fn test_spins_are_bipolar() {
        let mut rng = StdRng::seed_from_u64(7);
        let s = rng.spins(500);
        assert!(s.iter().all(|&v| v == 1.0 || v == -1.0));
        assert!(s.contains(&1.0) && s.contains(&-1.0));
    }

    #[test]
    fn test_seeded_sources_agree() {
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);
        assert_eq!(a.uniform(-1.0, 1.0, 16), b.uniform(-1.0, 1.0, 16));
        assert_eq!(a.spins(16), b.spins(16));
    }
}
