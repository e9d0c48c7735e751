use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense identifier of a proteoform within one [`StateSpace`](crate::core::space::state_space::StateSpace).
///
/// Identifiers are contiguous (`0..2^R`) so per-state data can live in plain vectors
/// indexed by [`ProteoformId::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProteoformId(u32);

impl ProteoformId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for ProteoformId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ProteoformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
