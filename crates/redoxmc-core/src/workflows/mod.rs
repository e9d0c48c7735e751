//! # Workflows Module
//!
//! End-to-end entry points built on top of [`engine`](crate::engine) and
//! [`analysis`](crate::analysis).
//!
//! - **Simulation** ([`simulate`]) - initializes the population, advances every
//!   molecule step by step (in parallel with the `parallel` feature) and aggregates
//!   the final snapshot.
//! - **Export** ([`export`]) - CSV results sink for trajectories, occupancy,
//!   k-grade histograms and per-step statistics.

pub mod export;
pub mod simulate;
