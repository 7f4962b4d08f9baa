//! Error types for the simulation crate.

use thiserror::Error;

/// Errors that can occur while simulating a circuit.
///
/// These are runtime failures: they are caught inside the worker that owns
/// the job, which records them and moves on to the next job.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Requested state vector exceeds the global memory ceiling.
    #[error("State of {requested} qubits exceeds the {max}-qubit memory ceiling")]
    ResourceExhausted {
        /// Requested qubit count.
        requested: u32,
        /// The ceiling.
        max: u32,
    },

    /// Internal unitarity invariant violated: the state norm drifted beyond
    /// tolerance after a gate.
    #[error("State norm drifted to {norm} (tolerance {tolerance})")]
    NormViolation {
        /// Measured squared norm.
        norm: f64,
        /// Allowed deviation from 1.0.
        tolerance: f64,
    },

    /// A noise rate is outside `[0, 1]`.
    #[error("Noise rate '{name}' is {rate}, must be within [0, 1]")]
    InvalidNoiseRate {
        /// Which rate.
        name: &'static str,
        /// The offending value.
        rate: f64,
    },
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
