//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur while constructing circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate applied to a qubit outside the circuit's register.
    #[error("Qubit {qubit} out of range for {num_qubits}-qubit circuit")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// The circuit's qubit count.
        num_qubits: u32,
    },

    /// Measurement bound to a classical bit outside the circuit's register.
    #[error("Classical bit {clbit} out of range for {num_clbits}-bit circuit")]
    ClbitOutOfRange {
        /// The offending classical bit.
        clbit: ClbitId,
        /// The circuit's classical bit count.
        num_clbits: u32,
    },

    /// Gate requires a different number of target qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// The same qubit appears twice in one gate's target list.
    #[error("Duplicate qubit {qubit} in gate '{gate_name}'")]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Name of the gate.
        gate_name: String,
    },

    /// Rotation angle is NaN or infinite.
    #[error("Gate '{gate_name}' has a non-finite parameter {value}")]
    InvalidParameter {
        /// Name of the gate.
        gate_name: String,
        /// The offending value.
        value: f64,
    },

    /// Custom gate matrix has the wrong dimensions.
    #[error("Custom gate '{name}' matrix has {got} entries, expected {expected}")]
    InvalidMatrix {
        /// Name of the custom gate.
        name: String,
        /// Expected entry count (dim squared).
        expected: usize,
        /// Actual entry count.
        got: usize,
    },

    /// Custom gate matrix is not unitary within tolerance.
    #[error("Custom gate '{name}' matrix is not unitary")]
    NonUnitaryMatrix {
        /// Name of the custom gate.
        name: String,
    },

    /// Gate spans more qubits than the engine supports.
    #[error("Gate '{gate_name}' spans {requested} qubits, maximum is {max}")]
    UnsupportedGateWidth {
        /// Name of the gate.
        gate_name: String,
        /// Requested width.
        requested: u32,
        /// Supported maximum.
        max: u32,
    },

    /// Circuit is sealed because a job referencing it has started running.
    #[error("Circuit '{name}' is sealed and can no longer be modified")]
    CircuitSealed {
        /// Name of the circuit.
        name: String,
    },

    /// Circuit id does not resolve in the registry.
    #[error("Circuit not found: {0}")]
    CircuitNotFound(u64),

    /// Search target pattern does not fit the circuit's register.
    #[error("Search target {target:#b} outside {num_qubits}-qubit space")]
    TargetOutOfRange {
        /// The offending basis-state pattern.
        target: u64,
        /// The circuit's qubit count.
        num_qubits: u32,
    },

    /// Circuit must have at least one qubit.
    #[error("Circuit '{name}' must have at least one qubit")]
    EmptyRegister {
        /// Name of the circuit.
        name: String,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
