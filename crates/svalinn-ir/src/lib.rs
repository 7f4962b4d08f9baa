//! Svalinn circuit representation.
//!
//! This crate provides the data structures for describing quantum circuits:
//! the typed [`Gate`] set with its pure matrix library, the append-only
//! [`Circuit`] builder, the [`CircuitRegistry`] owning named circuits, and
//! pre-built algorithm constructors (Grover, QFT).
//!
//! # Example: building a Bell state
//!
//! ```rust
//! use svalinn_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new("bell", 2, 2).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cnot(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.len(), 2);
//! ```
//!
//! # Supported gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `I`, `X`, `Y`, `Z` | 1 | Identity and Pauli gates |
//! | `H` | 1 | Hadamard gate |
//! | `S`, `T` | 1 | Phase gates |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotation gates |
//! | `Cnot`, `Cz` | 2 | Controlled-X and controlled-Z |
//! | `Swap` | 2 | SWAP gate |
//! | `Toffoli` | 3 | CCX gate |
//! | `Fredkin` | 3 | CSWAP gate |
//! | `Custom` | 1–4 | User-supplied unitary matrix |

pub mod algorithms;
pub mod circuit;
pub mod error;
pub mod gate;
pub mod matrix;
pub mod qubit;
pub mod registry;

pub use circuit::{Circuit, Measurement};
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, GateOp, MAX_GATE_QUBITS};
pub use matrix::{is_unitary, matrix_for};
pub use qubit::{ClbitId, QubitId};
pub use registry::{CircuitId, CircuitRegistry};
