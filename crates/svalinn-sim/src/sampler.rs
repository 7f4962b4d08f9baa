//! Measurement sampling.
//!
//! Sampling follows the repeated-preparation model: the state produced by a
//! run is treated as freshly prepared for every shot, so the vector is never
//! collapsed or mutated. Each shot draws one full basis-state index from the
//! Born distribution, then applies readout perturbation bit by bit, which
//! preserves correlations between qubits (a Bell state never yields `01` or
//! `10` under an ideal readout).

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::noise::NoiseModel;
use crate::statevector::Statevector;

/// Counts of observed basis states, keyed by basis-state index.
///
/// The counts always sum to the number of shots taken.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    counts: FxHashMap<u64, u64>,
    total: u64,
}

impl Histogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation of `index`.
    pub fn record(&mut self, index: u64) {
        *self.counts.entry(index).or_insert(0) += 1;
        self.total += 1;
    }

    /// The count for a basis state, zero if never observed.
    pub fn get(&self, index: u64) -> u64 {
        self.counts.get(&index).copied().unwrap_or(0)
    }

    /// Total observations recorded.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct basis states observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no observations were recorded.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterate over `(basis state, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts.iter().map(|(&k, &v)| (k, v))
    }
}

/// Draw `shots` measurements from the Born distribution of `state`.
///
/// The cumulative distribution is built once; each shot does a binary search
/// over it, then readout noise may flip individual bits of the outcome.
pub fn sample_shots<R: Rng>(
    state: &Statevector,
    shots: u32,
    noise: &NoiseModel,
    rng: &mut R,
) -> Histogram {
    let mut histogram = Histogram::new();
    if shots == 0 {
        return histogram;
    }

    let mut cumulative = Vec::with_capacity(state.amplitudes().len());
    let mut acc = 0.0;
    for amplitude in state.amplitudes() {
        acc += amplitude.norm_sqr();
        cumulative.push(acc);
    }
    // acc is 1.0 up to rounding; scaling the draw by it keeps the search in
    // range either way.
    let scale = acc;

    for _ in 0..shots {
        let r = rng.r#gen::<f64>() * scale;
        let mut index = cumulative.partition_point(|&c| c <= r) as u64;
        if index as usize >= cumulative.len() {
            index = cumulative.len() as u64 - 1;
        }
        let observed = noise.perturb_readout(index, state.num_qubits(), rng);
        histogram.record(observed);
    }
    histogram
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use svalinn_ir::{Gate, GateOp, QubitId};

    fn op(gate: Gate, targets: &[u32]) -> GateOp {
        GateOp::new(gate, targets.iter().copied().map(QubitId).collect()).unwrap()
    }

    #[test]
    fn test_concentrated_state_samples_deterministically() {
        let mut sv = Statevector::new(3).unwrap();
        sv.apply(&op(Gate::X, &[0])).unwrap();
        sv.apply(&op(Gate::X, &[2])).unwrap(); // |101⟩

        let mut rng = StdRng::seed_from_u64(1);
        let hist = sample_shots(&sv, 1000, &NoiseModel::ideal(), &mut rng);
        assert_eq!(hist.get(0b101), 1000);
        assert_eq!(hist.len(), 1);
        assert_eq!(hist.total(), 1000);
    }

    #[test]
    fn test_zero_shots_yields_empty_histogram() {
        let sv = Statevector::new(2).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let hist = sample_shots(&sv, 0, &NoiseModel::ideal(), &mut rng);
        assert!(hist.is_empty());
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn test_total_always_equals_shots() {
        let mut sv = Statevector::new(2).unwrap();
        sv.apply(&op(Gate::H, &[0])).unwrap();
        sv.apply(&op(Gate::H, &[1])).unwrap();

        let mut rng = StdRng::seed_from_u64(2);
        for shots in [1u32, 17, 256, 4096] {
            let hist = sample_shots(&sv, shots, &NoiseModel::ideal(), &mut rng);
            assert_eq!(hist.total(), shots as u64);
        }
    }

    #[test]
    fn test_bell_state_preserves_correlations() {
        let mut sv = Statevector::new(2).unwrap();
        sv.apply(&op(Gate::H, &[0])).unwrap();
        sv.apply(&op(Gate::Cnot, &[0, 1])).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let hist = sample_shots(&sv, 2000, &NoiseModel::ideal(), &mut rng);
        assert_eq!(hist.get(0b01), 0);
        assert_eq!(hist.get(0b10), 0);
        assert_eq!(hist.get(0b00) + hist.get(0b11), 2000);
        // Both outcomes show up in 2000 shots of a fair coin.
        assert!(hist.get(0b00) > 0 && hist.get(0b11) > 0);
    }

    #[test]
    fn test_sampling_does_not_mutate_state() {
        let mut sv = Statevector::new(2).unwrap();
        sv.apply(&op(Gate::H, &[0])).unwrap();
        let before = sv.amplitudes().to_vec();

        let mut rng = StdRng::seed_from_u64(4);
        let _ = sample_shots(&sv, 100, &NoiseModel::ideal(), &mut rng);
        assert_eq!(sv.amplitudes(), &before[..]);
    }

    #[test]
    fn test_certain_readout_error_inverts_outcomes() {
        let sv = Statevector::new(2).unwrap(); // |00⟩
        let noise = NoiseModel::ideal().with_readout(1.0, 0.0).enabled();
        let mut rng = StdRng::seed_from_u64(5);
        let hist = sample_shots(&sv, 100, &noise, &mut rng);
        assert_eq!(hist.get(0b11), 100);
    }

    #[test]
    fn test_histogram_serde_round_trip() {
        let mut hist = Histogram::new();
        hist.record(0);
        hist.record(3);
        hist.record(3);
        let json = serde_json::to_string(&hist).unwrap();
        let back: Histogram = serde_json::from_str(&json).unwrap();
        assert_eq!(hist, back);
    }
}
