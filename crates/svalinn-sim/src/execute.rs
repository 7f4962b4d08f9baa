//! Circuit execution: evolve a state vector through a circuit, then sample.

use rand::Rng;
use std::time::Instant;
use tracing::debug;

use svalinn_ir::Circuit;

use crate::error::SimResult;
use crate::noise::NoiseModel;
use crate::sampler::{Histogram, sample_shots};
use crate::statevector::Statevector;

/// Run a circuit with a caller-supplied random source.
///
/// The circuit is evolved once from `|0...0⟩`, then `shots` measurements are
/// drawn from the final state under the repeated-preparation model. Noise
/// rates are validated before any state is allocated.
pub fn run_with_rng<R: Rng>(
    circuit: &Circuit,
    shots: u32,
    noise: &NoiseModel,
    rng: &mut R,
) -> SimResult<Histogram> {
    noise.validate()?;
    let state = evolve(circuit, noise, rng)?;
    Ok(sample_shots(&state, shots, noise, rng))
}

/// Run a circuit with the thread-local random source.
pub fn run(circuit: &Circuit, shots: u32, noise: &NoiseModel) -> SimResult<Histogram> {
    run_with_rng(circuit, shots, noise, &mut rand::thread_rng())
}

/// Evolve a fresh `|0...0⟩` state through every gate of the circuit.
///
/// With an enabled noise model, stochastic Pauli errors are injected on each
/// gate's targets as the state evolves.
pub fn evolve<R: Rng>(
    circuit: &Circuit,
    noise: &NoiseModel,
    rng: &mut R,
) -> SimResult<Statevector> {
    let start = Instant::now();
    let mut state = Statevector::new(circuit.num_qubits())?;
    for op in circuit.ops() {
        state.apply(op)?;
        noise.apply_gate_noise(&mut state, &op.targets, rng);
    }
    debug!(
        circuit = circuit.name(),
        num_qubits = circuit.num_qubits(),
        gates = circuit.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "circuit evolved"
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use svalinn_ir::{Circuit, QubitId, algorithms};

    #[test]
    fn test_deterministic_circuit() {
        let mut circuit = Circuit::new("flip", 2, 2).unwrap();
        circuit.x(QubitId(0)).unwrap();
        circuit.x(QubitId(1)).unwrap();

        let hist = run(&circuit, 500, &NoiseModel::ideal()).unwrap();
        assert_eq!(hist.get(0b11), 500);
    }

    #[test]
    fn test_bell_circuit_counts() {
        let circuit = Circuit::bell().unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let hist = run_with_rng(&circuit, 1000, &NoiseModel::ideal(), &mut rng).unwrap();
        assert_eq!(hist.get(0b00) + hist.get(0b11), 1000);
        assert!(hist.get(0b00) > 300 && hist.get(0b11) > 300);
    }

    #[test]
    fn test_invalid_noise_fails_before_evolution() {
        let circuit = Circuit::bell().unwrap();
        let noise = NoiseModel::ideal().with_phase_flip(2.0);
        assert!(run(&circuit, 10, &noise).is_err());
    }

    #[test]
    fn test_qft_produces_uniform_superposition() {
        // QFT of |000⟩ is the uniform superposition.
        let circuit = algorithms::qft(3).unwrap();
        let mut rng = StdRng::seed_from_u64(12);
        let state = evolve(&circuit, &NoiseModel::ideal(), &mut rng).unwrap();
        for index in 0..8 {
            assert!((state.probability(index) - 0.125).abs() < 1e-10);
        }
    }

    #[test]
    fn test_grover_amplifies_target() {
        let circuit = algorithms::grover(2, 0b11, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(13);
        let state = evolve(&circuit, &NoiseModel::ideal(), &mut rng).unwrap();
        // One iteration on a 4-element space concentrates all amplitude.
        assert!((state.probability(0b11) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_grover_three_qubits() {
        let circuit = algorithms::grover(3, 0b101, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(14);
        let state = evolve(&circuit, &NoiseModel::ideal(), &mut rng).unwrap();
        // Two iterations on 8 elements reach ~94.5% on the target.
        assert!(state.probability(0b101) > 0.9);
    }

    #[test]
    fn test_noisy_run_keeps_total() {
        let circuit = Circuit::bell().unwrap();
        let noise = NoiseModel::ideal()
            .with_bit_flip(0.05)
            .with_depolarizing(0.02)
            .with_readout(0.01, 0.03)
            .enabled();
        let mut rng = StdRng::seed_from_u64(15);
        let hist = run_with_rng(&circuit, 2048, &noise, &mut rng).unwrap();
        assert_eq!(hist.total(), 2048);
    }
}
