//! Pre-built algorithm circuits: Grover's search and the quantum Fourier
//! transform.
//!
//! Both are pure circuit construction — they introduce no state or
//! concurrency of their own and can be registered and submitted like any
//! hand-built circuit.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::gate::{CustomGate, Gate, MAX_GATE_QUBITS};
use crate::qubit::QubitId;

/// The canonical Grover iteration count ⌈π·√N/4⌉ for an N-element search
/// space.
///
/// Note that the formula overshoots for small spaces: for N = 4 a single
/// iteration already concentrates all amplitude on the target, and a second
/// one spreads it out again. [`grover`] therefore takes the iteration count
/// explicitly.
pub fn grover_iterations(num_qubits: u32) -> usize {
    let n = (1u64 << num_qubits) as f64;
    ((PI / 4.0) * n.sqrt()).ceil() as usize
}

/// Build a Grover search circuit for `target` in a `2^num_qubits` space.
///
/// Structure: uniform superposition, then per iteration an oracle phase-flip
/// on the target pattern followed by the diffusion operator
/// (H–X–multi-controlled-Z–X–H), then measurement on every qubit.
///
/// The multi-controlled Z spans every qubit, so circuits wider than
/// [`MAX_GATE_QUBITS`] are rejected; generic decomposition is out of scope.
pub fn grover(num_qubits: u32, target: u64, iterations: usize) -> IrResult<Circuit> {
    if num_qubits == 0 || num_qubits > MAX_GATE_QUBITS {
        return Err(IrError::UnsupportedGateWidth {
            gate_name: "mcz".to_string(),
            requested: num_qubits,
            max: MAX_GATE_QUBITS,
        });
    }
    if target >= 1u64 << num_qubits {
        return Err(IrError::TargetOutOfRange { target, num_qubits });
    }

    let mut circuit = Circuit::new(format!("grover_{num_qubits}q"), num_qubits, num_qubits)?;

    // Uniform superposition.
    for q in 0..num_qubits {
        circuit.h(QubitId(q))?;
    }

    for _ in 0..iterations {
        // Oracle: conjugate a multi-controlled Z with X on the zero bits of
        // the pattern, so only |target⟩ picks up the phase flip.
        for q in 0..num_qubits {
            if target & (1 << q) == 0 {
                circuit.x(QubitId(q))?;
            }
        }
        append_mcz(&mut circuit, num_qubits)?;
        for q in 0..num_qubits {
            if target & (1 << q) == 0 {
                circuit.x(QubitId(q))?;
            }
        }

        // Diffusion: inversion about the mean.
        for q in 0..num_qubits {
            circuit.h(QubitId(q))?;
        }
        for q in 0..num_qubits {
            circuit.x(QubitId(q))?;
        }
        append_mcz(&mut circuit, num_qubits)?;
        for q in 0..num_qubits {
            circuit.x(QubitId(q))?;
        }
        for q in 0..num_qubits {
            circuit.h(QubitId(q))?;
        }
    }

    circuit.measure_all()?;
    Ok(circuit)
}

/// Append a Z controlled on every qubit of the circuit: flips the phase of
/// the all-ones basis state.
fn append_mcz(circuit: &mut Circuit, num_qubits: u32) -> IrResult<()> {
    match num_qubits {
        1 => {
            circuit.z(QubitId(0))?;
        }
        2 => {
            circuit.cz(QubitId(0), QubitId(1))?;
        }
        3 => {
            // CCZ = H on the target around a Toffoli.
            circuit.h(QubitId(2))?;
            circuit.toffoli(QubitId(0), QubitId(1), QubitId(2))?;
            circuit.h(QubitId(2))?;
        }
        _ => {
            let gate = phase_flip_gate("mcz", num_qubits, (1u64 << num_qubits) - 1)?;
            let targets = (0..num_qubits).map(QubitId).collect();
            circuit.add_gate(Gate::Custom(gate), targets)?;
        }
    }
    Ok(())
}

/// Diagonal gate flipping the phase of a single basis state.
fn phase_flip_gate(name: &str, num_qubits: u32, pattern: u64) -> IrResult<CustomGate> {
    let dim = 1usize << num_qubits;
    let mut matrix = vec![Complex64::new(0.0, 0.0); dim * dim];
    for i in 0..dim {
        let sign = if i as u64 == pattern { -1.0 } else { 1.0 };
        matrix[i * dim + i] = Complex64::new(sign, 0.0);
    }
    CustomGate::new(name, num_qubits, matrix)
}

/// Build a quantum Fourier transform circuit.
///
/// For each qubit i: H, then controlled phase rotations of angle π/2^(j−i)
/// from every later qubit j; finally the qubit order is reversed with SWAPs.
/// Controlled phases are expressed as custom 4×4 diagonal gates since the
/// core gate set has no phase-rotation two-qubit gate.
pub fn qft(num_qubits: u32) -> IrResult<Circuit> {
    let mut circuit = Circuit::new(format!("qft_{num_qubits}q"), num_qubits, 0)?;

    for i in 0..num_qubits {
        circuit.h(QubitId(i))?;
        for j in (i + 1)..num_qubits {
            let k = j - i;
            let angle = PI / (1u64 << k) as f64;
            let gate = controlled_phase(angle)?;
            circuit.add_gate(Gate::Custom(gate), vec![QubitId(j), QubitId(i)])?;
        }
    }

    // Bit-reversal.
    for i in 0..num_qubits / 2 {
        circuit.swap(QubitId(i), QubitId(num_qubits - 1 - i))?;
    }

    Ok(circuit)
}

/// Controlled phase rotation: `diag(1, 1, 1, e^{iθ})`.
///
/// Symmetric in its two operands, so control/target order does not matter.
pub fn controlled_phase(theta: f64) -> IrResult<CustomGate> {
    let one = Complex64::new(1.0, 0.0);
    let zero = Complex64::new(0.0, 0.0);
    let phase = Complex64::from_polar(1.0, theta);
    let matrix = vec![
        one, zero, zero, zero, //
        zero, one, zero, zero, //
        zero, zero, one, zero, //
        zero, zero, zero, phase,
    ];
    CustomGate::new("cp", 2, matrix)
}
