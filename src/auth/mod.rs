//! Bearer token issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying a subject identifier and an
//! absolute expiry. They are opaque to holders and validated entirely
//! server-side; there is no revocation list, so a token issued for a since
//! deleted account remains structurally valid until it expires. Callers who
//! need the subject to still exist must resolve it against the identity
//! store (see [`crate::identity::services::AccountService::authenticate`]).

mod error;
mod token;

pub use error::CredentialError;
pub use token::{DEFAULT_TTL_MINUTES, TokenService};
