//! Error types for credential issuance and verification.

use thiserror::Error;

/// Errors returned while issuing or verifying bearer tokens.
///
/// Every verification variant maps to an unauthorized response at the
/// transport boundary; the variants exist so logs and tests can tell the
/// failure modes apart.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The token signature is invalid or the token is malformed.
    #[error("credential is invalid")]
    InvalidToken,

    /// The token expiry has passed.
    #[error("credential has expired")]
    Expired,

    /// The subject claim is absent, empty, or not a valid identifier.
    #[error("credential subject is missing or malformed")]
    InvalidSubject,

    /// Token encoding failed while issuing a credential.
    #[error("token encoding failed: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}
