use crate::core::error::{LookupError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid simulation input: {0}")]
    Validation(#[from] ValidationError),

    #[error("State lookup failed: {0}")]
    Lookup(#[from] LookupError),
}
