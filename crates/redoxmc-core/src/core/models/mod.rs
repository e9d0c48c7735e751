//! # Core Models Module
//!
//! Value types describing a single molecule's oxidation pattern and its identity
//! inside a state space.
//!
//! - [`ids`] - The dense [`ProteoformId`](ids::ProteoformId) handle
//! - [`vector`] - The bit-packed [`ModificationVector`](vector::ModificationVector)
//!   with k-grade and Hamming-distance helpers

pub mod ids;
pub mod vector;
