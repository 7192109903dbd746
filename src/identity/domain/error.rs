//! Error types for identity domain validation.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The username is empty, too long, or contains whitespace.
    #[error("invalid username '{0}', expected 1-50 characters without whitespace")]
    InvalidUsername(String),

    /// The email address is empty, too long, or structurally invalid.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),
}
