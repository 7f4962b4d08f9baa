//! Svalinn statevector simulation engine.
//!
//! Evolves dense `2^n` state vectors through circuits from `svalinn-ir`,
//! injects stochastic noise, and samples measurement histograms under the
//! repeated-preparation model.
//!
//! # Example
//!
//! ```rust
//! use svalinn_ir::Circuit;
//! use svalinn_sim::{NoiseModel, run};
//!
//! let circuit = Circuit::bell().unwrap();
//! let histogram = run(&circuit, 1024, &NoiseModel::ideal()).unwrap();
//! assert_eq!(histogram.total(), 1024);
//! ```

pub mod error;
pub mod execute;
pub mod noise;
pub mod sampler;
pub mod statevector;

pub use error::{SimError, SimResult};
pub use execute::{evolve, run, run_with_rng};
pub use noise::NoiseModel;
pub use sampler::{Histogram, sample_shots};
pub use statevector::{MAX_QUBITS, NORM_TOLERANCE, Statevector};
