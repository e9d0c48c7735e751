//! Deterministic reductions of simulation output.
//!
//! [`aggregate`] condenses one population snapshot into histograms and occupancy
//! figures; [`temporal`] follows those figures across the columns of a trajectory.

pub mod aggregate;
pub mod temporal;
