//! Utility functions for the engine module.
//!
//! Random primitives shared by the stochastic update: Bernoulli event draws and
//! uniform selection among candidate targets.

pub mod sampling;
