//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The source tag is empty or contains whitespace.
    #[error("invalid source tag '{0}'")]
    InvalidSource(String),

    /// The external identifier is empty or too long.
    #[error("invalid external identifier '{0}'")]
    InvalidExternalId(String),

    /// The task title is empty or too long.
    #[error("invalid task title '{0}', expected 1-200 characters")]
    InvalidTitle(String),

    /// The task description exceeds the persisted length limit.
    #[error("task description exceeds 1000 characters")]
    DescriptionTooLong,
}

/// Error returned while parsing task statuses from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing event kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown event kind: {0}")]
pub struct ParseEventKindError(pub String);
