//! Element-wise p-bit kernels.
//!
//! A p-bit with input field `I` settles to `sign(u + tanh(T·I))` where `u` is
//! uniform noise in `[-1, 1]`. These helpers cover the three halves of that
//! rule (squash, noise comparison, collapse) plus the flat OR coupling used by
//! the overflow pool and the range clamp used by gradient relaxation.

// ============================================================================
// Squash
// ============================================================================

/// `tanh(temperature · x)`. Higher pseudotemperature → sharper threshold.
#[inline(always)]
pub fn squash(x: f64, temperature: f64) -> f64 {
    (temperature * x).tanh()
}

/// In-place [`squash`] over a slice.
pub fn squash_in_place(values: &mut [f64], temperature: f64) {
    for v in values.iter_mut() {
        *v = squash(*v, temperature);
    }
}

// ============================================================================
// Collapse
// ============================================================================

/// Bipolar collapse: `+1` for strictly positive input, `-1` otherwise.
#[inline(always)]
pub fn pbit_sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Collapse `noise + activation` element-wise.
///
/// # Panics
/// If the slices differ in length.
pub fn collapse(noise: &[f64], activation: &[f64]) -> Vec<f64> {
    assert_eq!(noise.len(), activation.len(), "noise/activation length mismatch");
    noise
        .iter()
        .zip(activation)
        .map(|(&r, &a)| pbit_sign(r + a))
        .collect()
}

// ============================================================================
// Clamp
// ============================================================================

/// Clip every value into the bipolar range `[-1, 1]`.
pub fn clip_unit(values: &mut [f64]) {
    for v in values.iter_mut() {
        *v = v.clamp(-1.0, 1.0);
    }
}

// ============================================================================
// OR coupling
// ============================================================================

/// Multiply by the flat OR-reduction coupling `J = I - 1·1ᵀ`.
///
/// Row `k` of `J·s` is `-Σ_{l≠k} s_l`; every cell is repelled by every other
/// cell of the pool and never by itself. An empty pool yields an empty result.
pub fn or_coupling(states: &[f64]) -> Vec<f64> {
    let total: f64 = states.iter().sum();
    states.iter().map(|&s| s - total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squash_sharpens_with_temperature() {
        let soft = squash(0.5, 1.0);
        let hard = squash(0.5, 10.0);
        assert!(hard > soft);
        assert!((hard - 1.0).abs() < 1e-2);
        assert_eq!(squash(0.0, 5.0), 0.0);
    }

    #[test]
    fn test_pbit_sign_zero_collapses_down() {
        assert_eq!(pbit_sign(0.0), -1.0);
        assert_eq!(pbit_sign(1e-12), 1.0);
        assert_eq!(pbit_sign(-3.0), -1.0);
    }

    #[test]
    fn test_collapse_saturated_activation_ignores_noise() {
        let noise = [-0.99, 0.0, 0.99];
        let out = collapse(&noise, &[1.0, 1.0, -1.0]);
        assert_eq!(out, vec![1.0, 1.0, -1.0]);
    }

    #[test]
    fn test_clip_unit() {
        let mut v = [-3.0, -0.5, 0.0, 0.7, 2.0];
        clip_unit(&mut v);
        assert_eq!(v, [-1.0, -0.5, 0.0, 0.7, 1.0]);
    }

    #[test]
    fn test_or_coupling_matches_dense_matrix() {
        let s = [1.0, -1.0, 1.0, 0.5];
        let fast = or_coupling(&s);
        for (k, &got) in fast.iter().enumerate() {
            let dense: f64 = s
                .iter()
                .enumerate()
                .map(|(l, &v)| if l == k { 0.0 } else { -v })
                .sum();
            assert!((got - dense).abs() < 1e-12);
        }
    }

    #[test]
    fn test_or_coupling_empty_pool() {
        assert!(or_coupling(&[]).is_empty());
    }
}
