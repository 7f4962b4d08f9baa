//! Backend descriptors and registry.
//!
//! Backends are static capability records: a job is validated against one at
//! submission, and the descriptor never changes while jobs run. Both default
//! backends execute on the same statevector engine; they differ only in the
//! capacity they advertise.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SchedError, SchedResult};

/// A simulation backend descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backend {
    /// Stable identifier used when submitting jobs.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Widest circuit the backend accepts.
    pub max_qubits: u32,
    /// Largest shot count the backend accepts.
    pub max_shots: u32,
    /// Advertised readout fidelity, informational only.
    pub readout_fidelity: f64,
    /// Whether the backend currently accepts jobs.
    pub available: bool,
}

impl Backend {
    /// The full statevector backend: wide circuits, large shot counts.
    pub fn statevector() -> Self {
        Self {
            id: "statevector".to_string(),
            name: "Dense statevector simulator".to_string(),
            max_qubits: 24,
            max_shots: 1_000_000,
            readout_fidelity: 0.999,
            available: true,
        }
    }

    /// The constrained sampling backend: modeled after a small noisy device.
    pub fn shot_sampler() -> Self {
        Self {
            id: "shot_sampler".to_string(),
            name: "Shot sampler".to_string(),
            max_qubits: 12,
            max_shots: 8192,
            readout_fidelity: 0.98,
            available: true,
        }
    }

    /// Check a job's requirements against this backend's capacity.
    pub fn validate(&self, num_qubits: u32, shots: u32) -> SchedResult<()> {
        if !self.available {
            return Err(SchedError::BackendUnavailable(self.id.clone()));
        }
        if num_qubits > self.max_qubits {
            return Err(SchedError::CapacityExceeded {
                backend: self.id.clone(),
                reason: format!("{num_qubits} qubits requested, limit is {}", self.max_qubits),
            });
        }
        if shots > self.max_shots {
            return Err(SchedError::CapacityExceeded {
                backend: self.id.clone(),
                reason: format!("{shots} shots requested, limit is {}", self.max_shots),
            });
        }
        Ok(())
    }
}

/// An owned collection of backends keyed by id.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    backends: FxHashMap<String, Backend>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the two built-in backends.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Backend::statevector());
        registry.register(Backend::shot_sampler());
        registry
    }

    /// Register a backend, replacing any previous one with the same id.
    pub fn register(&mut self, backend: Backend) {
        debug!(id = %backend.id, "Registering backend");
        self.backends.insert(backend.id.clone(), backend);
    }

    /// Look up a backend by id.
    pub fn get(&self, id: &str) -> SchedResult<&Backend> {
        self.backends
            .get(id)
            .ok_or_else(|| SchedError::UnknownBackend(id.to_string()))
    }

    /// Iterate over registered backends in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Backend> {
        self.backends.values()
    }

    /// Number of registered backends.
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let registry = BackendRegistry::with_defaults();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("statevector").unwrap().max_qubits, 24);
        assert_eq!(registry.get("shot_sampler").unwrap().max_shots, 8192);
    }

    #[test]
    fn test_unknown_backend() {
        let registry = BackendRegistry::with_defaults();
        assert!(matches!(
            registry.get("ion_trap").unwrap_err(),
            SchedError::UnknownBackend(_)
        ));
    }

    #[test]
    fn test_capacity_validation() {
        let backend = Backend::shot_sampler();
        assert!(backend.validate(12, 8192).is_ok());

        let err = backend.validate(13, 100).unwrap_err();
        assert!(matches!(err, SchedError::CapacityExceeded { .. }));

        let err = backend.validate(2, 10_000).unwrap_err();
        assert!(matches!(err, SchedError::CapacityExceeded { .. }));
    }

    #[test]
    fn test_unavailable_backend_rejects() {
        let mut backend = Backend::statevector();
        backend.available = false;
        assert!(matches!(
            backend.validate(1, 1).unwrap_err(),
            SchedError::BackendUnavailable(_)
        ));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = BackendRegistry::with_defaults();
        let mut patched = Backend::statevector();
        patched.available = false;
        registry.register(patched);
        assert_eq!(registry.len(), 2);
        assert!(!registry.get("statevector").unwrap().available);
    }
}
