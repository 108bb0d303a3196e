//! Adam moment estimation for one activation group.
//!
//! The moments are plain data; the timestep is owned by the caller so several
//! groups advanced together share one bias-correction schedule.

use serde::{Deserialize, Serialize};

/// Adam hyper-parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdamConfig {
    pub lr: f64,
    pub beta_1: f64,
    pub beta_2: f64,
    pub epsilon: f64,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            lr: 1e-3,
            beta_1: 0.9,
            beta_2: 0.999,
            epsilon: 1e-7,
        }
    }
}

/// First and second raw moment estimates, one slot per p-bit in the group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdamMoments {
    pub m: Vec<f64>,
    pub v: Vec<f64>,
}

impl AdamMoments {
    pub fn zeros(len: usize) -> Self {
        Self {
            m: vec![0.0; len],
            v: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.m.is_empty()
    }

    /// Fold `grads` into the moments and return the scaled step
    /// `lr · m̂ / (√v̂ + ε)` for timestep `t` (1-based).
    ///
    /// # Panics
    /// If `grads` does not match the group size, or `t == 0`.
    pub fn step(&mut self, grads: &[f64], t: u64, cfg: &AdamConfig) -> Vec<f64> {
        assert_eq!(grads.len(), self.m.len(), "gradient length does not match moments");
        assert!(t > 0, "Adam timestep is 1-based");

        let exp = i32::try_from(t).unwrap_or(i32::MAX);
        let bias_1 = 1.0 - cfg.beta_1.powi(exp);
        let bias_2 = 1.0 - cfg.beta_2.powi(exp);

        let mut out = Vec::with_capacity(grads.len());
        for ((m, v), &g) in self.m.iter_mut().zip(self.v.iter_mut()).zip(grads) {
            *m = cfg.beta_1 * *m + (1.0 - cfg.beta_1) * g;
            *v = cfg.beta_2 * *v + (1.0 - cfg.beta_2) * g * g;
            let m_hat = *m / bias_1;
            let v_hat = *v / bias_2;
            out.push(cfg.lr * m_hat / (v_hat.sqrt() + cfg.epsilon));
        }
        out
    }
}
