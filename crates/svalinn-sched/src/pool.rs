//! Fixed worker pool executing jobs from a shared queue.
//!
//! Workers are OS threads blocking on a condition variable over a FIFO
//! queue of job ids. A job is claimed exactly once: the queue pop hands the
//! id to a single worker, and the `Submitted -> Running` transition happens
//! under the job's own lock, so a cancellation that won the race is observed
//! and the job is skipped. Runtime failures are recorded on the job and the
//! worker moves on; a panic in one job never takes the pool down because
//! simulation errors are values, not panics.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError, RwLock};
use std::thread::JoinHandle;

use rustc_hash::FxHashMap;
use tracing::{debug, error, info};

use svalinn_ir::CircuitRegistry;
use svalinn_sim::{Histogram, NoiseModel};

use crate::error::{SchedError, SchedResult};
use crate::job::{Job, JobId, JobStatus};

struct Shared {
    queue: Mutex<VecDeque<JobId>>,
    available: Condvar,
    jobs: RwLock<FxHashMap<JobId, Arc<Mutex<Job>>>>,
    circuits: Arc<CircuitRegistry>,
    noise: RwLock<NoiseModel>,
    shutdown: AtomicBool,
}

/// A pool of worker threads draining a FIFO job queue.
///
/// With zero workers the pool still accepts and tracks jobs; they simply
/// stay `Submitted`, which the tests use to exercise cancellation.
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn a pool with a fixed number of workers over a circuit registry.
    pub fn new(num_workers: usize, circuits: Arc<CircuitRegistry>) -> Self {
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            jobs: RwLock::new(FxHashMap::default()),
            circuits,
            noise: RwLock::new(NoiseModel::ideal()),
            shutdown: AtomicBool::new(false),
        });

        let mut workers = Vec::with_capacity(num_workers);
        for i in 0..num_workers {
            let shared = Arc::clone(&shared);
            let builder = std::thread::Builder::new().name(format!("svalinn-worker-{i}"));
            match builder.spawn(move || worker_loop(&shared)) {
                Ok(handle) => workers.push(handle),
                Err(err) => error!(%err, "Failed to spawn worker thread"),
            }
        }
        info!(workers = workers.len(), "Worker pool started");
        Self { shared, workers }
    }

    /// Enqueue a job and wake one worker.
    pub fn submit(&self, job: Job) -> JobId {
        let id = job.id;
        debug!(job = %id, circuit = %job.circuit, backend = %job.backend, "Job submitted");
        self.shared
            .jobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(job)));
        self.shared
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(id);
        self.shared.available.notify_one();
        id
    }

    /// Current status of a job.
    pub fn status(&self, id: JobId) -> SchedResult<JobStatus> {
        let job = self.job(id)?;
        let job = job.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(job.status.clone())
    }

    /// Result histogram of a completed job.
    pub fn result(&self, id: JobId) -> SchedResult<Histogram> {
        let job = self.job(id)?;
        let job = job.lock().unwrap_or_else(PoisonError::into_inner);
        match (&job.status, &job.result) {
            (JobStatus::Completed, Some(histogram)) => Ok(histogram.clone()),
            _ => Err(SchedError::ResultNotReady(id)),
        }
    }

    /// Cancel a job that no worker has claimed yet.
    ///
    /// Only `Submitted` jobs can be cancelled; once a worker owns the job
    /// the run is carried to completion.
    pub fn cancel(&self, id: JobId) -> SchedResult<()> {
        let job = self.job(id)?;
        let mut job = job.lock().unwrap_or_else(PoisonError::into_inner);
        if job.status != JobStatus::Submitted {
            return Err(SchedError::InvalidJobState {
                job: id,
                expected: "submitted",
                found: job.status.name().to_string(),
            });
        }
        job.status = JobStatus::Cancelled;
        job.finished_at = Some(chrono::Utc::now());
        info!(job = %id, "Job cancelled");
        Ok(())
    }

    /// Replace the noise model applied to subsequent runs.
    pub fn set_noise(&self, noise: NoiseModel) {
        *self
            .shared
            .noise
            .write()
            .unwrap_or_else(PoisonError::into_inner) = noise;
    }

    /// Snapshot of the current noise model.
    pub fn noise(&self) -> NoiseModel {
        self.shared
            .noise
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of jobs the pool has ever accepted.
    pub fn job_count(&self) -> usize {
        self.shared
            .jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Stop the workers and join them. Queued jobs stay `Submitted`.
    pub fn shutdown(&mut self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        self.shared.available.notify_all();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("Worker thread panicked");
            }
        }
    }

    fn job(&self, id: JobId) -> SchedResult<Arc<Mutex<Job>>> {
        self.shared
            .jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(SchedError::JobNotFound(id))
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let id = {
            let mut queue = shared
                .queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            loop {
                if shared.shutdown.load(Ordering::SeqCst) {
                    return;
                }
                if let Some(id) = queue.pop_front() {
                    break id;
                }
                queue = shared
                    .available
                    .wait(queue)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };
        run_job(shared, id);
    }
}

fn run_job(shared: &Shared, id: JobId) {
    let Some(job) = shared
        .jobs
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .cloned()
    else {
        error!(job = %id, "Queued job missing from job table");
        return;
    };

    // Claim under the job lock: a cancellation that already landed wins.
    let (circuit_id, shots) = {
        let mut job = job.lock().unwrap_or_else(PoisonError::into_inner);
        if job.status != JobStatus::Submitted {
            debug!(job = %id, status = %job.status, "Skipping claimed or cancelled job");
            return;
        }
        job.status = JobStatus::Running;
        job.started_at = Some(chrono::Utc::now());
        (job.circuit, job.shots)
    };

    // Seal the circuit before snapshotting so late appends cannot change
    // what this run executes.
    let outcome = shared
        .circuits
        .get(circuit_id)
        .map_err(SchedError::from)
        .and_then(|circuit| {
            let snapshot = {
                let mut circuit = circuit.lock().unwrap_or_else(PoisonError::into_inner);
                circuit.seal();
                circuit.clone()
            };
            let noise = shared
                .noise
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            svalinn_sim::run(&snapshot, shots, &noise).map_err(SchedError::from)
        });

    let mut job = job.lock().unwrap_or_else(PoisonError::into_inner);
    job.finished_at = Some(chrono::Utc::now());
    match outcome {
        Ok(histogram) => {
            info!(job = %id, shots, outcomes = histogram.len(), "Job completed");
            job.result = Some(histogram);
            job.status = JobStatus::Completed;
        }
        Err(err) => {
            error!(job = %id, %err, "Job failed");
            job.status = JobStatus::Failed {
                reason: err.to_string(),
            };
        }
    }
}
