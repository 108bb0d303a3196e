//! Counter-network p-bit multiplier.
//!
//! Owns the immutable geometry, the evolving state, the Adam moments and the
//! random source. Construction validates `n` and the target range and fails
//! without building anything; iteration is total.

use log::{debug, trace};
use pbit_core::SpinSource;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::activation::{compute_activations, compute_gradients, Activations};
use crate::codec::{decode_inputs, decode_output};
use crate::error::{MultiplierError, Result};
use crate::evolution::{descent, sample, OptimizerState};
use crate::geometry::Geometry;
use crate::params::MultiplierParams;
use crate::state::NetworkState;

/// An n-bit carry-save multiplier of probabilistic AND / counter / OR gates
/// with the product bits clamped to a target.
#[derive(Debug, Clone)]
pub struct CounterMultiplier<R: SpinSource = StdRng> {
    geometry: Geometry,
    state: NetworkState,
    optimizer: OptimizerState,
    params: MultiplierParams,
    output: u128,
    rng: R,
}

impl CounterMultiplier<StdRng> {
    /// Build with a `StdRng` seeded from `params.seed`, or from OS entropy
    /// when no seed is given.
    pub fn new(n: usize, output: u128, params: MultiplierParams) -> Result<Self> {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(n, output, params, rng)
    }
}

impl<R: SpinSource> CounterMultiplier<R> {
    /// Build with an explicit random source.
    pub fn with_rng(n: usize, output: u128, params: MultiplierParams, mut rng: R) -> Result<Self> {
        let geometry = Geometry::build(n)?;
        let max = 1u128 << (n + 1);
        if output > max {
            return Err(MultiplierError::OutputOutOfRange { output, max });
        }

        let state = NetworkState::seeded(&geometry, output, &mut rng);
        let optimizer = OptimizerState::new(&geometry);
        debug!(
            "multiplier n={} output={} T={} lr={}",
            n, output, params.pseudotemperature, params.lr
        );

        Ok(Self {
            geometry,
            state,
            optimizer,
            params,
            output,
            rng,
        })
    }

    /// Sampling-scale fields of the current state.
    pub fn compute_activations(&self) -> Activations {
        compute_activations(&self.geometry, &self.state, self.params.pseudotemperature)
    }

    /// Gradient-scale fields of the current state.
    pub fn compute_gradients(&self) -> Activations {
        compute_gradients(&self.geometry, &self.state, self.params.and_temp)
    }

    /// Advance by one Monte-Carlo sweep.
    pub fn stochastic_iteration(&mut self) {
        let act = self.compute_activations();
        sample(&self.geometry, &mut self.state, &act, &mut self.rng);
        trace!("stochastic sweep inputs={:?}", self.get_inputs());
    }

    /// Advance by one Adam step.
    pub fn deterministic_iteration(&mut self) {
        let grads = self.compute_gradients();
        let opt = std::mem::take(&mut self.optimizer);
        self.optimizer = descent(
            &self.geometry,
            &mut self.state,
            &grads,
            opt,
            &self.params.adam(),
        );
        trace!(
            "adam step t={} inputs={:?}",
            self.optimizer.timestep,
            self.get_inputs()
        );
    }

    /// Operands `(A, B)` decoded from the current state.
    pub fn get_inputs(&self) -> (u128, u128) {
        decode_inputs(&self.state)
    }

    /// Product decoded from the clamped and counter product bits.
    pub fn get_output(&self) -> u128 {
        decode_output(&self.geometry, &self.state)
    }

    /// Whether the current operands multiply to the decoded product.
    pub fn is_consistent(&self) -> bool {
        let (a, b) = self.get_inputs();
        a * b == self.get_output()
    }

    pub fn set_pseudotemperature(&mut self, temperature: f64) {
        self.params.pseudotemperature = temperature;
    }

    pub fn pseudotemperature(&self) -> f64 {
        self.params.pseudotemperature
    }

    /// Target passed at construction.
    pub fn target(&self) -> u128 {
        self.output
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn state(&self) -> &NetworkState {
        &self.state
    }

    pub fn optimizer(&self) -> &OptimizerState {
        &self.optimizer
    }

    pub fn params(&self) -> &MultiplierParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(n: usize, output: u128, seed: u64) -> CounterMultiplier {
        CounterMultiplier::new(n, output, MultiplierParams::default().with_seed(seed)).unwrap()
    }

    #[test]
    fn test_rejects_odd_width_without_building() {
        let err = CounterMultiplier::new(5, 3, MultiplierParams::default()).unwrap_err();
        assert_eq!(err, MultiplierError::OddWidth { n: 5 });
        assert_eq!(err.to_string(), "n=5 must be even");
    }

    #[test]
    fn test_rejects_output_above_range() {
        let err = CounterMultiplier::new(4, 33, MultiplierParams::default()).unwrap_err();
        assert_eq!(err, MultiplierError::OutputOutOfRange { output: 33, max: 32 });
        // the bound itself is accepted
        assert!(CounterMultiplier::new(4, 32, MultiplierParams::default()).is_ok());
    }

    #[test]
    fn test_four_by_six_scenario() {
        let m = seeded(4, 6, 0);
        assert_eq!(m.state().first_bit(), -1.0);
        assert_eq!(m.state().last_bit(), -1.0);
        assert_eq!(m.geometry().rows(), 2);
        assert_eq!(m.geometry().dims()[0].as_tuple(), (2, 0, 2));
        assert_eq!(m.get_output(), 6);
    }

    #[test]
    fn test_output_decodes_within_width() {
        for n in [4usize, 6, 8, 12, 16, 32, 64] {
            let top = (1u128 << n) - 1;
            for output in [0, 1, top / 3, top] {
                let m = seeded(n, output, n as u64);
                assert!(m.get_output() <= top);
                assert_eq!(m.get_output(), output);
            }
        }
    }

    #[test]
    fn test_output_above_width_sets_top_bit() {
        let m = seeded(4, 0b1_0110, 3);
        assert_eq!(m.get_output(), 0b1110);
        assert_eq!(m.target(), 0b1_0110);
        assert_eq!(seeded(4, 16, 3).get_output(), 0b1000);
        assert_eq!(seeded(4, 32, 3).get_output(), 0b1000);
    }

    #[test]
    fn test_pseudotemperature_setter() {
        let mut m = seeded(6, 9, 1);
        m.set_pseudotemperature(4.0);
        assert_eq!(m.pseudotemperature(), 4.0);
        assert_eq!(m.params().pseudotemperature, 4.0);
    }

    #[test]
    fn test_deterministic_iteration_advances_optimizer() {
        let mut m = seeded(8, 35, 2);
        m.deterministic_iteration();
        m.deterministic_iteration();
        assert_eq!(m.optimizer().timestep, 2);
    }
}
