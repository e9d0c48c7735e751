use crate::core::models::ids::ProteoformId;
use crate::core::models::vector::{MAX_SITES, ModificationVector};
use thiserror::Error;

/// Malformed state-space input or out-of-range configuration. Always raised before a
/// run starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Site count must be between 1 and {max}, got {0}", max = MAX_SITES)]
    SiteCount(usize),

    #[error("Expected {sites} site names, got {names}")]
    SiteNames { sites: usize, names: usize },

    #[error("State table must contain exactly {expected} states for {sites} sites, found {found}")]
    StateCount {
        sites: usize,
        expected: usize,
        found: usize,
    },

    #[error("State '{label}' has {found} site values, expected {expected}")]
    RowWidth {
        label: String,
        expected: usize,
        found: usize,
    },

    #[error("State '{label}' has non-binary value {value} at site {site}")]
    NonBinaryCell { label: String, site: usize, value: u8 },

    #[error("State '{label}' repeats the modification vector of '{first}'")]
    DuplicateVector { label: String, first: String },

    #[error("State label '{0}' appears more than once")]
    DuplicateLabel(String),

    #[error("Probability '{name}' must lie in [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },

    #[error("Molecule count must be positive")]
    NoMolecules,

    #[error("Initial state {id} is not part of the state space ({len} states)")]
    UnknownInitialState { id: ProteoformId, len: usize },

    #[error("Initial state label '{0}' is not part of the state space")]
    UnknownInitialLabel(String),

    #[error("Catalytic site index {site} is out of range for {sites} sites")]
    CatalyticSite { site: usize, sites: usize },

    #[error("Expected one random stream per molecule ({expected}), got {found}")]
    StreamCount { expected: usize, found: usize },

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// A vector or identifier that the state space cannot resolve. Indicates a defect
/// in enumeration or transition logic and is never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Modification vector {vector} is not indexed in the state space")]
    VectorNotIndexed { vector: ModificationVector },

    #[error("Proteoform {id} is not part of the state space")]
    UnknownState { id: ProteoformId },
}
