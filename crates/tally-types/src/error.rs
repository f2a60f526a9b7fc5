use thiserror::Error;

/// A submission rejected before it reaches the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("score must be non-negative, got {0}")]
    NegativeScore(i64),
}
