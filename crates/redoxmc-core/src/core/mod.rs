//! # Core Module
//!
//! Stateless building blocks of the proteoform redox simulator: the value types for
//! oxidation patterns, the enumerated state space, the shared error taxonomy and the
//! tabular I/O used to exchange state tables and results with the outside world.
//!
//! - **Models** ([`models`]) - [`ProteoformId`](models::ids::ProteoformId) and
//!   [`ModificationVector`](models::vector::ModificationVector)
//! - **State space** ([`space`]) - Complete `2^R` enumeration with k-grade index and
//!   reverse lookup, built once and read-only afterwards
//! - **Errors** ([`error`]) - `ValidationError` and `LookupError`
//! - **File I/O** ([`io`]) - CSV state-table supplier
//! - **Utilities** ([`utils`]) - Binomial coefficients and k-subset enumeration

pub mod error;
pub mod io;
pub mod models;
pub mod space;
pub mod utils;
