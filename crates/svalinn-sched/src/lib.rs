//! Svalinn job scheduler and simulator facade.
//!
//! Ties the circuit registry, the backend registry, and a fixed pool of
//! worker threads into a [`Simulator`]: submit a registered circuit against
//! a named backend, poll the job, collect the measurement histogram.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use svalinn_ir::Circuit;
//! use svalinn_sched::Simulator;
//!
//! let sim = Simulator::new();
//! let circuit = sim.register_circuit(Circuit::bell().unwrap());
//! let job = sim.submit_job(circuit, "statevector", 1024).unwrap();
//! sim.wait_for(job, Duration::from_secs(5)).unwrap();
//! let histogram = sim.job_result(job).unwrap();
//! assert_eq!(histogram.total(), 1024);
//! ```

pub mod backend;
pub mod error;
pub mod job;
pub mod pool;
pub mod simulator;

pub use backend::{Backend, BackendRegistry};
pub use error::{SchedError, SchedResult};
pub use job::{Job, JobId, JobStatus};
pub use pool::WorkerPool;
pub use simulator::{DEFAULT_WORKERS, Simulator};
