//! Stochastic noise model.
//!
//! Channels are approximated by Monte Carlo sampling: after each gate of a
//! run, each target qubit may suffer a Pauli error with the configured
//! probability, and at readout each classical bit may be flipped. A run with
//! the model disabled touches no random state beyond sampling itself.

use rand::Rng;
use serde::{Deserialize, Serialize};

use svalinn_ir::{Gate, QubitId, matrix_for};

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Noise rates applied during simulation.
///
/// All rates are probabilities in `[0, 1]`; [`NoiseModel::validate`] is
/// called before a run starts so a bad rate fails the job up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseModel {
    /// Master switch. When false all rates are ignored.
    pub enabled: bool,
    /// Probability of an X error on each target qubit after a gate.
    pub bit_flip: f64,
    /// Probability of a Z error on each target qubit after a gate.
    pub phase_flip: f64,
    /// Probability of a uniformly random Pauli error (X, Y or Z) on each
    /// target qubit after a gate.
    pub depolarizing: f64,
    /// Probability of reading a 0 as a 1.
    pub readout_p01: f64,
    /// Probability of reading a 1 as a 0.
    pub readout_p10: f64,
}

impl NoiseModel {
    /// A disabled model with all rates zero.
    pub fn ideal() -> Self {
        Self {
            enabled: false,
            bit_flip: 0.0,
            phase_flip: 0.0,
            depolarizing: 0.0,
            readout_p01: 0.0,
            readout_p10: 0.0,
        }
    }

    /// Enable the model.
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Set the bit-flip rate.
    pub fn with_bit_flip(mut self, rate: f64) -> Self {
        self.bit_flip = rate;
        self
    }

    /// Set the phase-flip rate.
    pub fn with_phase_flip(mut self, rate: f64) -> Self {
        self.phase_flip = rate;
        self
    }

    /// Set the depolarizing rate.
    pub fn with_depolarizing(mut self, rate: f64) -> Self {
        self.depolarizing = rate;
        self
    }

    /// Set the asymmetric readout error rates.
    pub fn with_readout(mut self, p01: f64, p10: f64) -> Self {
        self.readout_p01 = p01;
        self.readout_p10 = p10;
        self
    }

    /// Check every rate is a probability.
    pub fn validate(&self) -> SimResult<()> {
        let rates = [
            ("bit_flip", self.bit_flip),
            ("phase_flip", self.phase_flip),
            ("depolarizing", self.depolarizing),
            ("readout_p01", self.readout_p01),
            ("readout_p10", self.readout_p10),
        ];
        for (name, rate) in rates {
            if !(0.0..=1.0).contains(&rate) || rate.is_nan() {
                return Err(SimError::InvalidNoiseRate { name, rate });
            }
        }
        Ok(())
    }

    /// Apply gate noise to each qubit a gate just acted on.
    pub fn apply_gate_noise<R: Rng>(
        &self,
        state: &mut Statevector,
        targets: &[QubitId],
        rng: &mut R,
    ) {
        if !self.enabled {
            return;
        }
        for &qubit in targets {
            if self.depolarizing > 0.0 && rng.r#gen::<f64>() < self.depolarizing {
                let pauli = match rng.gen_range(0..3) {
                    0 => Gate::X,
                    1 => Gate::Y,
                    _ => Gate::Z,
                };
                state.apply_single(qubit, &matrix_for(&pauli));
            }
            if self.bit_flip > 0.0 && rng.r#gen::<f64>() < self.bit_flip {
                state.apply_single(qubit, &matrix_for(&Gate::X));
            }
            if self.phase_flip > 0.0 && rng.r#gen::<f64>() < self.phase_flip {
                state.apply_single(qubit, &matrix_for(&Gate::Z));
            }
        }
    }

    /// Perturb a sampled basis-state index with per-bit readout errors.
    pub fn perturb_readout<R: Rng>(&self, index: u64, num_qubits: u32, rng: &mut R) -> u64 {
        if !self.enabled || (self.readout_p01 == 0.0 && self.readout_p10 == 0.0) {
            return index;
        }
        let mut out = index;
        for q in 0..num_qubits {
            let bit = 1u64 << q;
            let rate = if index & bit == 0 {
                self.readout_p01
            } else {
                self.readout_p10
            };
            if rate > 0.0 && rng.r#gen::<f64>() < rate {
                out ^= bit;
            }
        }
        out
    }
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self::ideal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_validate_rejects_bad_rates() {
        let model = NoiseModel::ideal().with_bit_flip(1.5);
        let err = model.validate().unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidNoiseRate { name: "bit_flip", .. }
        ));

        assert!(NoiseModel::ideal().with_readout(-0.1, 0.0).validate().is_err());
        assert!(NoiseModel::ideal().with_depolarizing(f64::NAN).validate().is_err());
        assert!(NoiseModel::ideal().validate().is_ok());
    }

    #[test]
    fn test_disabled_model_is_inert() {
        let model = NoiseModel::ideal().with_bit_flip(1.0).with_readout(1.0, 1.0);
        let mut rng = StdRng::seed_from_u64(7);

        let mut sv = Statevector::new(2).unwrap();
        model.apply_gate_noise(&mut sv, &[QubitId(0), QubitId(1)], &mut rng);
        assert!((sv.probability(0) - 1.0).abs() < 1e-12);
        assert_eq!(model.perturb_readout(0b01, 2, &mut rng), 0b01);
    }

    #[test]
    fn test_certain_bit_flip() {
        let model = NoiseModel::ideal().with_bit_flip(1.0).enabled();
        let mut rng = StdRng::seed_from_u64(7);
        let mut sv = Statevector::new(2).unwrap();
        model.apply_gate_noise(&mut sv, &[QubitId(0)], &mut rng);
        assert!((sv.probability(0b01) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_certain_readout_flip() {
        let model = NoiseModel::ideal().with_readout(1.0, 1.0).enabled();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(model.perturb_readout(0b010, 3, &mut rng), 0b101);
    }

    #[test]
    fn test_readout_asymmetry() {
        // Only 1→0 errors enabled: zeros never flip.
        let model = NoiseModel::ideal().with_readout(0.0, 1.0).enabled();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(model.perturb_readout(0b110, 3, &mut rng), 0b000);
    }
}
