//! Dense state vector simulation.
//!
//! A [`Statevector`] holds `2^n` complex amplitudes indexed little-endian:
//! bit `q` of a basis-state index is the value of qubit `q`. Gate
//! application walks the amplitude array with bit masks; two-qubit and wider
//! gates gather the affected amplitudes, multiply by the gate matrix, and
//! scatter the results back.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::trace;

use svalinn_ir::{Gate, GateOp, QubitId, matrix_for};

use crate::error::{SimError, SimResult};

/// Global ceiling on simulated register width. A 26-qubit state is one
/// gibibyte of amplitudes; anything larger is rejected up front rather than
/// left to the allocator.
pub const MAX_QUBITS: u32 = 26;

/// Allowed drift of the squared norm from 1.0 after each gate.
pub const NORM_TOLERANCE: f64 = 1e-6;

/// A dense state vector over `num_qubits` qubits.
#[derive(Debug, Clone)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: u32,
}

impl Statevector {
    /// Create a state vector initialized to `|0...0⟩`.
    pub fn new(num_qubits: u32) -> SimResult<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(SimError::ResourceExhausted {
                requested: num_qubits,
                max: MAX_QUBITS,
            });
        }
        let dim = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dim];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// The number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The amplitude array, `2^num_qubits` entries.
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Born probability of the basis state `index`.
    #[inline]
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes[index].norm_sqr()
    }

    /// Squared norm of the whole state. 1.0 for any valid state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Apply a gate operation to the state.
    ///
    /// Controlled and permutation gates take fast paths that move or negate
    /// amplitudes directly; everything else goes through its matrix. The
    /// squared norm is checked afterwards so numerical drift surfaces as an
    /// error instead of skewing sampling.
    pub fn apply(&mut self, op: &GateOp) -> SimResult<()> {
        trace!(gate = op.gate.name(), "applying gate");
        let t = &op.targets;
        match &op.gate {
            Gate::I => {}
            Gate::Cnot => self.apply_cnot(t[0], t[1]),
            Gate::Cz => self.apply_cz(t[0], t[1]),
            Gate::Swap => self.apply_swap(t[0], t[1]),
            Gate::Toffoli => self.apply_toffoli(t[0], t[1], t[2]),
            Gate::Fredkin => self.apply_fredkin(t[0], t[1], t[2]),
            Gate::Custom(g) => {
                let dim = g.dim();
                let m = Array2::from_shape_vec((dim, dim), g.matrix().to_vec())
                    .expect("custom gate entry count validated at construction");
                match g.num_qubits {
                    1 => self.apply_single(t[0], &m),
                    2 => self.apply_two(t[0], t[1], &m),
                    _ => self.apply_general(t, &m),
                }
            }
            gate => self.apply_single(t[0], &matrix_for(gate)),
        }
        self.check_normalized()
    }

    /// Apply a 2x2 matrix to one qubit.
    ///
    /// Visits each amplitude pair differing only in bit `qubit`.
    pub fn apply_single(&mut self, qubit: QubitId, m: &Array2<Complex64>) {
        let mask = qubit.mask();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[(0, 0)] * a + m[(0, 1)] * b;
                self.amplitudes[j] = m[(1, 0)] * a + m[(1, 1)] * b;
            }
        }
    }

    /// Apply a 4x4 matrix to a qubit pair.
    ///
    /// `q0` maps to bit 0 of the matrix index and `q1` to bit 1. Each group
    /// of four amplitudes differing only in those bits is gathered,
    /// multiplied, and scattered back.
    pub fn apply_two(&mut self, q0: QubitId, q1: QubitId, m: &Array2<Complex64>) {
        let m0 = q0.mask();
        let m1 = q1.mask();
        for base in 0..self.amplitudes.len() {
            if base & (m0 | m1) != 0 {
                continue;
            }
            let idx = [base, base | m0, base | m1, base | m0 | m1];
            let v = [
                self.amplitudes[idx[0]],
                self.amplitudes[idx[1]],
                self.amplitudes[idx[2]],
                self.amplitudes[idx[3]],
            ];
            for (r, &i) in idx.iter().enumerate() {
                self.amplitudes[i] =
                    m[(r, 0)] * v[0] + m[(r, 1)] * v[1] + m[(r, 2)] * v[2] + m[(r, 3)] * v[3];
            }
        }
    }

    /// Apply a `2^k x 2^k` matrix to `k` qubits.
    ///
    /// Qubit `k` of `targets` maps to bit `k` of the matrix index. Used for
    /// three- and four-qubit custom gates.
    pub fn apply_general(&mut self, targets: &[QubitId], m: &Array2<Complex64>) {
        let dim = 1usize << targets.len();
        let masks: Vec<usize> = targets.iter().map(|q| q.mask()).collect();
        let spanned: usize = masks.iter().sum();

        let mut idx = vec![0usize; dim];
        let mut old = vec![Complex64::new(0.0, 0.0); dim];
        for base in 0..self.amplitudes.len() {
            if base & spanned != 0 {
                continue;
            }
            for (local, slot) in idx.iter_mut().enumerate() {
                let mut global = base;
                for (k, mask) in masks.iter().enumerate() {
                    if local & (1 << k) != 0 {
                        global |= mask;
                    }
                }
                *slot = global;
            }
            for (slot, &i) in old.iter_mut().zip(idx.iter()) {
                *slot = self.amplitudes[i];
            }
            for (r, &i) in idx.iter().enumerate() {
                let mut acc = Complex64::new(0.0, 0.0);
                for (c, &v) in old.iter().enumerate() {
                    acc += m[(r, c)] * v;
                }
                self.amplitudes[i] = acc;
            }
        }
    }

    // CNOT permutes amplitude pairs: swap whenever the control bit is set.
    fn apply_cnot(&mut self, control: QubitId, target: QubitId) {
        let cm = control.mask();
        let tm = target.mask();
        for i in 0..self.amplitudes.len() {
            if i & cm != 0 && i & tm == 0 {
                self.amplitudes.swap(i, i | tm);
            }
        }
    }

    fn apply_cz(&mut self, q0: QubitId, q1: QubitId) {
        let both = q0.mask() | q1.mask();
        for i in 0..self.amplitudes.len() {
            if i & both == both {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_swap(&mut self, q0: QubitId, q1: QubitId) {
        let m0 = q0.mask();
        let m1 = q1.mask();
        for i in 0..self.amplitudes.len() {
            if i & m0 != 0 && i & m1 == 0 {
                self.amplitudes.swap(i, (i & !m0) | m1);
            }
        }
    }

    fn apply_toffoli(&mut self, c0: QubitId, c1: QubitId, target: QubitId) {
        let controls = c0.mask() | c1.mask();
        let tm = target.mask();
        for i in 0..self.amplitudes.len() {
            if i & controls == controls && i & tm == 0 {
                self.amplitudes.swap(i, i | tm);
            }
        }
    }

    fn apply_fredkin(&mut self, control: QubitId, t0: QubitId, t1: QubitId) {
        let cm = control.mask();
        let m0 = t0.mask();
        let m1 = t1.mask();
        for i in 0..self.amplitudes.len() {
            if i & cm != 0 && i & m0 != 0 && i & m1 == 0 {
                self.amplitudes.swap(i, (i & !m0) | m1);
            }
        }
    }

    fn check_normalized(&self) -> SimResult<()> {
        let norm = self.norm_sqr();
        if (norm - 1.0).abs() > NORM_TOLERANCE {
            return Err(SimError::NormViolation {
                norm,
                tolerance: NORM_TOLERANCE,
            });
        }
        Ok(())
    }
}
