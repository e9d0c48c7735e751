//! # State Space Module
//!
//! Enumeration and indexing of every proteoform of an `R`-site binary modification
//! system.
//!
//! A [`StateSpace`](state_space::StateSpace) is built exactly once, either by
//! generating all `C(R, k)` combinations for `k = 0..=R` or from an externally
//! supplied [`StateTable`](table::StateTable) so that labels stay stable across
//! separate runs. Both paths validate the full table before anything is exposed and
//! produce the same invariants:
//!
//! - identifiers ↔ vectors is a bijection over all `2^R` vectors
//! - the k-grade index partitions the states, bucket `k` holding `C(R, k)` entries
//! - lookups are O(1): per-state data is stored in dense vectors keyed by
//!   [`ProteoformId`](crate::core::models::ids::ProteoformId), and the reverse
//!   index is a dense table keyed by the vector's bit mask

pub mod state_space;
pub mod table;
