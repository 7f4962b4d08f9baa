//! Quantum gate types.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::matrix;
use crate::qubit::QubitId;

/// Maximum number of qubits a single gate may span.
///
/// Wider operations must be expressed as circuits; generic decomposition
/// is out of scope.
pub const MAX_GATE_QUBITS: u32 = 4;

/// A quantum gate.
///
/// Rotation gates carry their angle in radians. [`Gate::Custom`] carries an
/// explicit unitary matrix owned by the gate and freed with its circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// T gate (fourth root of Z).
    T,
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Controlled-X gate; targets are `[control, target]`.
    Cnot,
    /// Controlled-Z gate.
    Cz,
    /// SWAP gate.
    Swap,
    /// Toffoli (CCX) gate; targets are `[control, control, target]`.
    Toffoli,
    /// Fredkin (CSWAP) gate; targets are `[control, target, target]`.
    Fredkin,
    /// A user-defined gate with an explicit unitary matrix.
    Custom(CustomGate),
}

impl Gate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Gate::I => "id",
            Gate::X => "x",
            Gate::Y => "y",
            Gate::Z => "z",
            Gate::H => "h",
            Gate::S => "s",
            Gate::T => "t",
            Gate::Rx(_) => "rx",
            Gate::Ry(_) => "ry",
            Gate::Rz(_) => "rz",
            Gate::Cnot => "cx",
            Gate::Cz => "cz",
            Gate::Swap => "swap",
            Gate::Toffoli => "ccx",
            Gate::Fredkin => "cswap",
            Gate::Custom(g) => &g.name,
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::I
            | Gate::X
            | Gate::Y
            | Gate::Z
            | Gate::H
            | Gate::S
            | Gate::T
            | Gate::Rx(_)
            | Gate::Ry(_)
            | Gate::Rz(_) => 1,

            Gate::Cnot | Gate::Cz | Gate::Swap => 2,

            Gate::Toffoli | Gate::Fredkin => 3,

            Gate::Custom(g) => g.num_qubits,
        }
    }

    /// Get the rotation parameters of this gate, if any.
    pub fn params(&self) -> Vec<f64> {
        match self {
            Gate::Rx(theta) | Gate::Ry(theta) | Gate::Rz(theta) => vec![*theta],
            _ => vec![],
        }
    }

    /// Check that any parameters are finite numbers.
    pub fn validate_params(&self) -> IrResult<()> {
        for value in self.params() {
            if !value.is_finite() {
                return Err(IrError::InvalidParameter {
                    gate_name: self.name().to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// A user-defined gate carrying its own unitary matrix.
///
/// The matrix is stored row-major with `2^num_qubits × 2^num_qubits` entries.
/// Qubit `k` of the gate's target list maps to bit `k` of the row/column
/// index (see [`crate::matrix`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Row-major unitary matrix, `2^num_qubits × 2^num_qubits`.
    matrix: Vec<Complex64>,
}

impl CustomGate {
    /// Create a new custom gate, validating the matrix.
    ///
    /// Fails if `num_qubits` is outside `1..=MAX_GATE_QUBITS`, if the matrix
    /// has the wrong number of entries, or if it is not unitary within
    /// tolerance.
    pub fn new(
        name: impl Into<String>,
        num_qubits: u32,
        matrix: Vec<Complex64>,
    ) -> IrResult<Self> {
        let name = name.into();
        if num_qubits == 0 || num_qubits > MAX_GATE_QUBITS {
            return Err(IrError::UnsupportedGateWidth {
                gate_name: name,
                requested: num_qubits,
                max: MAX_GATE_QUBITS,
            });
        }
        let dim = 1usize << num_qubits;
        if matrix.len() != dim * dim {
            return Err(IrError::InvalidMatrix {
                name,
                expected: dim * dim,
                got: matrix.len(),
            });
        }
        if !matrix::is_unitary_rows(&matrix, dim) {
            return Err(IrError::NonUnitaryMatrix { name });
        }
        Ok(Self {
            name,
            num_qubits,
            matrix,
        })
    }

    /// Get the matrix entries in row-major order.
    #[inline]
    pub fn matrix(&self) -> &[Complex64] {
        &self.matrix
    }

    /// Matrix dimension (`2^num_qubits`).
    #[inline]
    pub fn dim(&self) -> usize {
        1 << self.num_qubits
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::Custom(gate)
    }
}

/// A gate bound to the qubits it acts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOp {
    /// The gate.
    pub gate: Gate,
    /// Target qubits, in the gate's operand order.
    pub targets: Vec<QubitId>,
}

impl GateOp {
    /// Bind a gate to its targets, validating arity and uniqueness.
    ///
    /// Bounds against the circuit's register are checked at append time.
    pub fn new(gate: Gate, targets: Vec<QubitId>) -> IrResult<Self> {
        gate.validate_params()?;
        let expected = gate.num_qubits();
        if targets.len() != expected as usize {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected,
                got: targets.len() as u32,
            });
        }
        for (i, qubit) in targets.iter().enumerate() {
            if targets[..i].contains(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit: *qubit,
                    gate_name: gate.name().to_string(),
                });
            }
        }
        Ok(Self { gate, targets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_gate_properties() {
        assert_eq!(Gate::H.num_qubits(), 1);
        assert_eq!(Gate::Cnot.num_qubits(), 2);
        assert_eq!(Gate::Toffoli.num_qubits(), 3);
        assert_eq!(Gate::H.name(), "h");
        assert_eq!(Gate::Rz(PI).params(), vec![PI]);
        assert!(Gate::Rz(PI).validate_params().is_ok());
        assert!(Gate::Rx(f64::NAN).validate_params().is_err());
    }

    #[test]
    fn test_gate_op_arity() {
        assert!(GateOp::new(Gate::H, vec![QubitId(0)]).is_ok());

        let err = GateOp::new(Gate::Cnot, vec![QubitId(0)]).unwrap_err();
        assert!(matches!(err, IrError::QubitCountMismatch { expected: 2, .. }));

        let err = GateOp::new(Gate::Cnot, vec![QubitId(1), QubitId(1)]).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_custom_gate_validation() {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);

        // Pauli-X as a custom matrix.
        let x = CustomGate::new("my_x", 1, vec![zero, one, one, zero]).unwrap();
        assert_eq!(x.dim(), 2);
        assert_eq!(Gate::from(x).num_qubits(), 1);

        // Wrong entry count.
        let err = CustomGate::new("bad", 1, vec![one, zero]).unwrap_err();
        assert!(matches!(err, IrError::InvalidMatrix { expected: 4, got: 2, .. }));

        // Non-unitary.
        let err = CustomGate::new("bad", 1, vec![one, one, one, one]).unwrap_err();
        assert!(matches!(err, IrError::NonUnitaryMatrix { .. }));

        // Too wide.
        let err = CustomGate::new("wide", 5, vec![]).unwrap_err();
        assert!(matches!(err, IrError::UnsupportedGateWidth { max: 4, .. }));
    }

    #[test]
    fn test_gate_serde_round_trip() {
        let gate = Gate::Rx(PI / 2.0);
        let json = serde_json::to_string(&gate).unwrap();
        let back: Gate = serde_json::from_str(&json).unwrap();
        assert_eq!(gate, back);
    }
}
