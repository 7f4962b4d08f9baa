//! The top-level simulator facade.
//!
//! A [`Simulator`] owns one circuit registry, one backend registry, and one
//! worker pool. Nothing is process-global: two simulators in the same
//! process are completely independent, which is what the test suite relies
//! on.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use svalinn_ir::{Circuit, CircuitId, CircuitRegistry, ClbitId, Gate, QubitId};
use svalinn_sim::{Histogram, NoiseModel};

use crate::backend::{Backend, BackendRegistry};
use crate::error::{SchedError, SchedResult};
use crate::job::{Job, JobId, JobStatus};
use crate::pool::WorkerPool;

/// Default worker count when none is given.
pub const DEFAULT_WORKERS: usize = 4;

/// An isolated simulation service instance.
pub struct Simulator {
    circuits: Arc<CircuitRegistry>,
    backends: BackendRegistry,
    pool: WorkerPool,
}

impl Simulator {
    /// Create a simulator with the default backends and worker count.
    pub fn new() -> Self {
        Self::with_workers(DEFAULT_WORKERS)
    }

    /// Create a simulator with an explicit worker count.
    pub fn with_workers(num_workers: usize) -> Self {
        Self::with_backends(num_workers, BackendRegistry::with_defaults())
    }

    /// Create a simulator with a caller-supplied backend registry.
    pub fn with_backends(num_workers: usize, backends: BackendRegistry) -> Self {
        let circuits = Arc::new(CircuitRegistry::new());
        let pool = WorkerPool::new(num_workers, Arc::clone(&circuits));
        info!(num_workers, backends = backends.len(), "Simulator created");
        Self {
            circuits,
            backends,
            pool,
        }
    }

    // =========================================================================
    // Circuits
    // =========================================================================

    /// Create and register an empty circuit.
    pub fn create_circuit(
        &self,
        name: impl Into<String>,
        num_qubits: u32,
        num_clbits: u32,
    ) -> SchedResult<CircuitId> {
        Ok(self.circuits.create(name, num_qubits, num_clbits)?)
    }

    /// Register a pre-built circuit, e.g. from the algorithm library.
    pub fn register_circuit(&self, circuit: Circuit) -> CircuitId {
        self.circuits.register(circuit)
    }

    /// Append a gate to a registered circuit.
    pub fn add_gate(
        &self,
        circuit: CircuitId,
        gate: Gate,
        targets: Vec<QubitId>,
    ) -> SchedResult<()> {
        Ok(self.circuits.add_gate(circuit, gate, targets)?)
    }

    /// Record a measurement binding on a registered circuit.
    pub fn add_measurement(
        &self,
        circuit: CircuitId,
        qubit: QubitId,
        clbit: ClbitId,
    ) -> SchedResult<()> {
        Ok(self.circuits.add_measurement(circuit, qubit, clbit)?)
    }

    /// The circuit registry, for direct access in tests and tools.
    pub fn circuits(&self) -> &CircuitRegistry {
        &self.circuits
    }

    // =========================================================================
    // Backends
    // =========================================================================

    /// Look up a backend descriptor.
    pub fn backend(&self, id: &str) -> SchedResult<&Backend> {
        self.backends.get(id)
    }

    /// Iterate over available backend descriptors.
    pub fn backends(&self) -> impl Iterator<Item = &Backend> {
        self.backends.iter()
    }

    // =========================================================================
    // Jobs
    // =========================================================================

    /// Validate and enqueue a job.
    ///
    /// Validation happens before the job record exists: an unknown backend,
    /// an unavailable one, or a capacity violation returns an error and
    /// leaves no trace in the scheduler.
    pub fn submit_job(
        &self,
        circuit: CircuitId,
        backend: &str,
        shots: u32,
    ) -> SchedResult<JobId> {
        let descriptor = self.backends.get(backend)?;
        let num_qubits = {
            let handle = self.circuits.get(circuit)?;
            let circuit = handle
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            circuit.num_qubits()
        };
        descriptor.validate(num_qubits, shots)?;
        Ok(self.pool.submit(Job::new(circuit, backend, shots)))
    }

    /// Current status of a job.
    pub fn job_status(&self, job: JobId) -> SchedResult<JobStatus> {
        self.pool.status(job)
    }

    /// Result histogram of a completed job.
    pub fn job_result(&self, job: JobId) -> SchedResult<Histogram> {
        self.pool.result(job)
    }

    /// Cancel a job that has not started running.
    pub fn cancel_job(&self, job: JobId) -> SchedResult<()> {
        self.pool.cancel(job)
    }

    /// Number of jobs ever accepted.
    pub fn job_count(&self) -> usize {
        self.pool.job_count()
    }

    /// Block until the job reaches a terminal state, polling its status.
    pub fn wait_for(&self, job: JobId, timeout: Duration) -> SchedResult<JobStatus> {
        let deadline = Instant::now() + timeout;
        loop {
            let status = self.pool.status(job)?;
            if status.is_terminal() {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                return Err(SchedError::ResultNotReady(job));
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    // =========================================================================
    // Noise
    // =========================================================================

    /// Replace the noise model applied to subsequent runs.
    ///
    /// Rates are validated here so a bad model is rejected immediately
    /// rather than failing every later job.
    pub fn set_noise(&self, noise: NoiseModel) -> SchedResult<()> {
        noise.validate()?;
        self.pool.set_noise(noise);
        Ok(())
    }

    /// Snapshot of the current noise model.
    pub fn noise(&self) -> NoiseModel {
        self.pool.noise()
    }

    /// Stop the worker pool. Runs automatically on drop.
    pub fn shutdown(&mut self) {
        self.pool.shutdown();
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}
