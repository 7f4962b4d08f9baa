//! Job records and lifecycle states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use svalinn_ir::CircuitId;
use svalinn_sim::Histogram;

/// Unique identifier for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a new random job id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a job.
///
/// Transitions are `Submitted -> Running -> Completed | Failed`, plus
/// `Submitted -> Cancelled`. Terminal states never change again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Queued, waiting for a worker.
    Submitted,
    /// Claimed by a worker and executing.
    Running,
    /// Finished with a result histogram.
    Completed,
    /// Finished with a runtime error.
    Failed {
        /// Human-readable failure reason.
        reason: String,
    },
    /// Cancelled before any worker claimed it.
    Cancelled,
}

impl JobStatus {
    /// Whether the job can never change state again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed { .. } | JobStatus::Cancelled
        )
    }

    /// Short state name for messages.
    pub fn name(&self) -> &'static str {
        match self {
            JobStatus::Submitted => "submitted",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed { .. } => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Failed { reason } => write!(f, "failed: {reason}"),
            other => f.write_str(other.name()),
        }
    }
}

/// A simulation job: a circuit, a backend choice, and a shot count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job id.
    pub id: JobId,
    /// The registered circuit to run.
    pub circuit: CircuitId,
    /// Backend id the job was validated against.
    pub backend: String,
    /// Number of measurement shots.
    pub shots: u32,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// When the job was submitted.
    pub created_at: DateTime<Utc>,
    /// When a worker claimed the job.
    pub started_at: Option<DateTime<Utc>>,
    /// When the job reached a terminal state.
    pub finished_at: Option<DateTime<Utc>>,
    /// Result histogram, present once completed.
    pub result: Option<Histogram>,
}

impl Job {
    /// Create a newly submitted job.
    pub fn new(circuit: CircuitId, backend: impl Into<String>, shots: u32) -> Self {
        Self {
            id: JobId::new(),
            circuit,
            backend: backend.into(),
            shots,
            status: JobStatus::Submitted,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
            result: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_is_submitted() {
        let job = Job::new(CircuitId(0), "statevector", 1024);
        assert_eq!(job.status, JobStatus::Submitted);
        assert!(job.started_at.is_none());
        assert!(job.result.is_none());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Submitted.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(JobStatus::Failed { reason: "x".into() }.is_terminal());
    }

    #[test]
    fn test_job_ids_are_unique() {
        assert_ne!(JobId::new(), JobId::new());
    }

    #[test]
    fn test_job_serde_round_trip() {
        let job = Job::new(CircuitId(7), "shot_sampler", 256);
        let json = serde_json::to_string(&job).unwrap();
        let back: Job = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, job.id);
        assert_eq!(back.status, JobStatus::Submitted);
        assert_eq!(back.shots, 256);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(JobStatus::Running.to_string(), "running");
        assert_eq!(
            JobStatus::Failed { reason: "norm drift".into() }.to_string(),
            "failed: norm drift"
        );
    }
}
