//! # redoxmc Core Library
//!
//! Stochastic simulation of how a population of protein molecules moves through the
//! combinatorial space of cysteine oxidation states (proteoforms) over discrete time.
//!
//! ## Architecture
//!
//! - **[`core`]: Models and I/O.** The `ModificationVector` over `R` sites, the fully
//!   enumerated `StateSpace` of `2^R` proteoforms with its k-grade index, and the
//!   tabular state-space supplier.
//!
//! - **[`engine`]: The stochastic core.** Configuration and validation, the
//!   single-site `TransitionModel`, the per-molecule `StochasticEngine`, independent
//!   random streams, and column-oriented `Trajectory` storage.
//!
//! - **[`analysis`]: Reductions.** Population snapshots condensed into k-grade
//!   histograms, per-state occupancy and the population redox state.
//!
//! - **[`workflows`]: The public API.** Runs a full simulation with progress reporting
//!   and cooperative interruption, and writes the results as CSV tables.

pub mod analysis;
pub mod core;
pub mod engine;
pub mod workflows;
