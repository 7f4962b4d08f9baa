//! Error types for the scheduler crate.

use thiserror::Error;

use crate::job::JobId;

/// Errors surfaced by the scheduler and simulator facade.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchedError {
    /// Backend id does not resolve in the registry.
    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    /// Backend exists but is marked unavailable.
    #[error("Backend '{0}' is not available")]
    BackendUnavailable(String),

    /// Circuit or shot count exceeds what the backend advertises.
    #[error("Backend '{backend}' cannot run this job: {reason}")]
    CapacityExceeded {
        /// Backend id.
        backend: String,
        /// What was exceeded.
        reason: String,
    },

    /// Job id does not resolve in the scheduler.
    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    /// Result requested for a job that has not completed.
    #[error("Result for job {0} is not ready")]
    ResultNotReady(JobId),

    /// Job is not in the state the operation requires.
    #[error("Job {job} is {found}, expected {expected}")]
    InvalidJobState {
        /// The job.
        job: JobId,
        /// Required state.
        expected: &'static str,
        /// Actual state.
        found: String,
    },

    /// Circuit construction or lookup error.
    #[error(transparent)]
    Ir(#[from] svalinn_ir::IrError),

    /// Simulation runtime error.
    #[error(transparent)]
    Sim(#[from] svalinn_sim::SimError),
}

/// Result type for scheduler operations.
pub type SchedResult<T> = Result<T, SchedError>;
