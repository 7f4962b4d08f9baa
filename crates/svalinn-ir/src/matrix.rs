//! The gate matrix library: pure mapping from gates to unitary matrices.
//!
//! # Index convention
//!
//! Qubit `k` of a gate's target list maps to bit `k` of the local row/column
//! index. For [`Gate::Cnot`] with targets `[control, target]` the control is
//! bit 0, so the matrix permutes local states 1 (`c=1, t=0`) and
//! 3 (`c=1, t=1`).

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use crate::gate::Gate;

/// Tolerance for unitarity checks.
pub const UNITARY_TOLERANCE: f64 = 1e-6;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Get the unitary matrix for a gate.
///
/// Pure and deterministic: the same gate always yields the same matrix.
/// Dimensions are `2^k × 2^k` for a `k`-qubit gate.
pub fn matrix_for(gate: &Gate) -> Array2<Complex64> {
    match gate {
        Gate::I => single([[ONE, ZERO], [ZERO, ONE]]),
        Gate::X => single([[ZERO, ONE], [ONE, ZERO]]),
        Gate::Y => single([[ZERO, -I], [I, ZERO]]),
        Gate::Z => single([[ONE, ZERO], [ZERO, -ONE]]),
        Gate::H => {
            let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
            single([[h, h], [h, -h]])
        }
        Gate::S => single([[ONE, ZERO], [ZERO, I]]),
        Gate::T => single([[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, FRAC_PI_4)]]),
        Gate::Rx(theta) => {
            let c = Complex64::new((theta / 2.0).cos(), 0.0);
            let s = Complex64::new(0.0, -(theta / 2.0).sin());
            single([[c, s], [s, c]])
        }
        Gate::Ry(theta) => {
            let c = Complex64::new((theta / 2.0).cos(), 0.0);
            let s = Complex64::new((theta / 2.0).sin(), 0.0);
            single([[c, -s], [s, c]])
        }
        Gate::Rz(theta) => single([
            [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
            [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
        ]),
        Gate::Cnot => permutation(4, &[(1, 3)]),
        Gate::Cz => {
            let mut m = Array2::eye(4);
            m[(3, 3)] = -ONE;
            m
        }
        Gate::Swap => permutation(4, &[(1, 2)]),
        Gate::Toffoli => permutation(8, &[(3, 7)]),
        Gate::Fredkin => permutation(8, &[(3, 5)]),
        Gate::Custom(g) => {
            let dim = g.dim();
            Array2::from_shape_vec((dim, dim), g.matrix().to_vec())
                .expect("custom gate entry count validated at construction")
        }
    }
}

fn single(rows: [[Complex64; 2]; 2]) -> Array2<Complex64> {
    Array2::from_shape_vec((2, 2), rows.concat()).expect("2x2 shape matches four entries")
}

/// Identity with the given index pairs transposed.
fn permutation(dim: usize, swaps: &[(usize, usize)]) -> Array2<Complex64> {
    let mut m = Array2::eye(dim);
    for &(a, b) in swaps {
        m[(a, a)] = ZERO;
        m[(b, b)] = ZERO;
        m[(a, b)] = ONE;
        m[(b, a)] = ONE;
    }
    m
}

/// Check that a matrix is unitary within [`UNITARY_TOLERANCE`].
pub fn is_unitary(matrix: ArrayView2<'_, Complex64>) -> bool {
    let dim = matrix.nrows();
    if matrix.ncols() != dim {
        return false;
    }
    // U†U must equal the identity.
    for row in 0..dim {
        for col in 0..dim {
            let mut acc = ZERO;
            for k in 0..dim {
                acc += matrix[(k, row)].conj() * matrix[(k, col)];
            }
            let expected = if row == col { ONE } else { ZERO };
            if (acc - expected).norm() > UNITARY_TOLERANCE {
                return false;
            }
        }
    }
    true
}

/// Unitarity check on a row-major slice, as stored by custom gates.
pub fn is_unitary_rows(entries: &[Complex64], dim: usize) -> bool {
    match ArrayView2::from_shape((dim, dim), entries) {
        Ok(view) => is_unitary(view),
        Err(_) => false,
    }
}
