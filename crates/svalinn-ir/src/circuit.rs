//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateOp};
use crate::qubit::{ClbitId, QubitId};

/// A measurement binding from a qubit to a classical bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// The measured qubit.
    pub qubit: QubitId,
    /// The classical bit receiving the outcome.
    pub clbit: ClbitId,
}

/// A quantum circuit: an append-only sequence of gates plus measurement
/// bindings.
///
/// Gates execute in exactly the order they were appended; there is no
/// reordering or optimization pass. Once a job referencing the circuit
/// starts running the circuit is sealed and rejects further appends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Number of classical bits.
    num_clbits: u32,
    /// Ordered gate list.
    ops: Vec<GateOp>,
    /// Ordered measurement bindings.
    measurements: Vec<Measurement>,
    /// Set when a job referencing this circuit enters Running.
    sealed: bool,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> IrResult<Self> {
        let name = name.into();
        if num_qubits == 0 {
            return Err(IrError::EmptyRegister { name });
        }
        Ok(Self {
            name,
            num_qubits,
            num_clbits,
            ops: Vec::new(),
            measurements: Vec::new(),
            sealed: false,
        })
    }

    /// Append a gate bound to the given target qubits.
    pub fn add_gate(&mut self, gate: Gate, targets: Vec<QubitId>) -> IrResult<&mut Self> {
        if self.sealed {
            return Err(IrError::CircuitSealed {
                name: self.name.clone(),
            });
        }
        let op = GateOp::new(gate, targets)?;
        for qubit in &op.targets {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit: *qubit,
                    num_qubits: self.num_qubits,
                });
            }
        }
        self.ops.push(op);
        Ok(self)
    }

    /// Record a measurement binding from a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        if self.sealed {
            return Err(IrError::CircuitSealed {
                name: self.name.clone(),
            });
        }
        if qubit.0 >= self.num_qubits {
            return Err(IrError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        if clbit.0 >= self.num_clbits {
            return Err(IrError::ClbitOutOfRange {
                clbit,
                num_clbits: self.num_clbits,
            });
        }
        self.measurements.push(Measurement { qubit, clbit });
        Ok(self)
    }

    /// Measure every qubit to the classical bit with the same index.
    ///
    /// Requires at least as many classical bits as qubits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        for i in 0..self.num_qubits {
            self.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::H, vec![qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::X, vec![qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::Y, vec![qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::Z, vec![qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::S, vec![qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::T, vec![qubit])
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::Rx(theta), vec![qubit])
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::Ry(theta), vec![qubit])
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::Rz(theta), vec![qubit])
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cnot(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::Cnot, vec![control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::Cz, vec![control, target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::Swap, vec![q1, q2])
    }

    /// Apply Toffoli (CCX) gate.
    pub fn toffoli(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::Toffoli, vec![c1, c2, target])
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn fredkin(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::Fredkin, vec![control, t1, t2])
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// Get the ordered gate list.
    pub fn ops(&self) -> &[GateOp] {
        &self.ops
    }

    /// Get the ordered measurement bindings.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Number of gates in the circuit.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Seal the circuit against further appends.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Check if the circuit is sealed.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::new("bell", 2, 2)?;
        circuit
            .h(QubitId(0))?
            .cnot(QubitId(0), QubitId(1))?
            .measure_all()?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::new("ghz", n, n)?;
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cnot(QubitId(i), QubitId(i + 1))?;
        }
        circuit.measure_all()?;
        Ok(circuit)
    }
}
