//! Named circuit registry.
//!
//! Circuits live in an owned collection rather than process-global state, so
//! independent registries (and the simulators owning them) are fully
//! isolated from one another. Each circuit sits behind its own mutex:
//! concurrent appends to the same circuit are serialized, appends to
//! different circuits proceed in parallel.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::qubit::{ClbitId, QubitId};

/// Unique identifier for a registered circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CircuitId(pub u64);

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "circuit-{}", self.0)
    }
}

/// An owned collection of circuits keyed by id.
///
/// Ids are monotonic and never reused; circuits are only destroyed with the
/// registry itself.
pub struct CircuitRegistry {
    circuits: RwLock<FxHashMap<CircuitId, Arc<Mutex<Circuit>>>>,
    next_id: AtomicU64,
}

impl CircuitRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            circuits: RwLock::new(FxHashMap::default()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Create and register a new empty circuit.
    pub fn create(
        &self,
        name: impl Into<String>,
        num_qubits: u32,
        num_clbits: u32,
    ) -> IrResult<CircuitId> {
        let circuit = Circuit::new(name, num_qubits, num_clbits)?;
        Ok(self.register(circuit))
    }

    /// Register a pre-built circuit, e.g. one produced by the algorithm
    /// library.
    pub fn register(&self, circuit: Circuit) -> CircuitId {
        let id = CircuitId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!("Registering circuit '{}' as {}", circuit.name(), id);
        self.circuits
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(circuit)));
        id
    }

    /// Get a handle to a registered circuit.
    pub fn get(&self, id: CircuitId) -> IrResult<Arc<Mutex<Circuit>>> {
        self.circuits
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(IrError::CircuitNotFound(id.0))
    }

    /// Append a gate to a registered circuit.
    pub fn add_gate(&self, id: CircuitId, gate: Gate, targets: Vec<QubitId>) -> IrResult<()> {
        let circuit = self.get(id)?;
        let mut circuit = circuit.lock().unwrap_or_else(PoisonError::into_inner);
        circuit.add_gate(gate, targets)?;
        Ok(())
    }

    /// Record a measurement binding on a registered circuit.
    pub fn add_measurement(&self, id: CircuitId, qubit: QubitId, clbit: ClbitId) -> IrResult<()> {
        let circuit = self.get(id)?;
        let mut circuit = circuit.lock().unwrap_or_else(PoisonError::into_inner);
        circuit.measure(qubit, clbit)?;
        Ok(())
    }

    /// Number of registered circuits.
    pub fn len(&self) -> usize {
        self.circuits
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CircuitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let registry = CircuitRegistry::new();
        let id = registry.create("test", 2, 2).unwrap();

        registry.add_gate(id, Gate::H, vec![QubitId(0)]).unwrap();
        registry
            .add_gate(id, Gate::Cnot, vec![QubitId(0), QubitId(1)])
            .unwrap();
        registry
            .add_measurement(id, QubitId(0), ClbitId(0))
            .unwrap();

        let circuit = registry.get(id).unwrap();
        let circuit = circuit.lock().unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.measurements().len(), 1);
    }

    #[test]
    fn test_unknown_id() {
        let registry = CircuitRegistry::new();
        assert!(matches!(
            registry.get(CircuitId(42)).unwrap_err(),
            IrError::CircuitNotFound(42)
        ));
    }

    #[test]
    fn test_invalid_append_reported() {
        let registry = CircuitRegistry::new();
        let id = registry.create("test", 1, 0).unwrap();

        let err = registry.add_gate(id, Gate::H, vec![QubitId(3)]).unwrap_err();
        assert!(matches!(err, IrError::QubitOutOfRange { .. }));
    }

    #[test]
    fn test_registries_are_isolated() {
        let a = CircuitRegistry::new();
        let b = CircuitRegistry::new();

        let id = a.create("only_in_a", 1, 1).unwrap();
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
        assert!(b.get(id).is_err());
    }

    #[test]
    fn test_ids_are_monotonic() {
        let registry = CircuitRegistry::new();
        let first = registry.create("a", 1, 0).unwrap();
        let second = registry.create("b", 1, 0).unwrap();
        assert!(second.0 > first.0);
    }

    #[test]
    fn test_concurrent_appends_serialize() {
        use std::sync::Arc;

        let registry = Arc::new(CircuitRegistry::new());
        let id = registry.create("shared", 1, 0).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        registry.add_gate(id, Gate::H, vec![QubitId(0)]).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let circuit = registry.get(id).unwrap();
        assert_eq!(circuit.lock().unwrap().len(), 200);
    }
}
