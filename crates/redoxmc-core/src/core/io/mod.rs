//! Tabular I/O for the state-space supplier boundary.
//!
//! State tables are CSV files with one row per proteoform: the first column holds
//! the label, every further column one site (`0` reduced, `1` oxidized). The header
//! of the label column is ignored, so tables exported by dataframe tools with a
//! blank or `Unnamed: 0` index header load unchanged.

pub mod table;
