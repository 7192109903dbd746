//! Error types for project domain validation.

use thiserror::Error;

/// Errors returned while constructing project domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project name is empty or too long.
    #[error("invalid project name '{0}', expected 1-100 characters")]
    InvalidName(String),

    /// The project description exceeds the persisted length limit.
    #[error("project description exceeds 500 characters")]
    DescriptionTooLong,
}
