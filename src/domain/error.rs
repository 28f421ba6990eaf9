//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed tree input.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("empty node id (label: {label:?})")]
    EmptyId { label: String },

    #[error("invalid collapse command: {0}")]
    InvalidCommand(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
