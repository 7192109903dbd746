//! HS256 bearer token service.

use super::CredentialError;
use crate::identity::domain::UserId;
use chrono::Duration;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default token lifetime in minutes.
pub const DEFAULT_TTL_MINUTES: i64 = 60;

/// Signed token payload: subject identifier and absolute expiry.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    exp: i64,
}

/// Issues and verifies HS256-signed bearer tokens.
///
/// The signing secret is an explicit constructor dependency rather than
/// process-wide configuration, so independent services (and tests) can hold
/// independent keys.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a token service signing with the given secret.
    #[must_use]
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret_bytes = secret.as_ref();
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is enforced exactly; the default 60s leeway would accept
        // tokens past their advertised expiry.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret_bytes),
            decoding: DecodingKey::from_secret(secret_bytes),
            validation,
        }
    }

    /// Issues a signed token for the given subject.
    ///
    /// The expiry is absolute: the clock's current time plus `ttl_minutes`.
    /// Issuance is stateless; nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Encoding`] when serialisation or signing
    /// fails.
    pub fn issue_token(
        &self,
        subject: UserId,
        ttl_minutes: i64,
        clock: &impl Clock,
    ) -> Result<String, CredentialError> {
        let expiry = clock.utc() + Duration::minutes(ttl_minutes);
        let claims = Claims {
            sub: Some(subject.to_string()),
            exp: expiry.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(CredentialError::Encoding)
    }

    /// Issues a signed token with the default lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Encoding`] when serialisation or signing
    /// fails.
    pub fn issue_default_token(
        &self,
        subject: UserId,
        clock: &impl Clock,
    ) -> Result<String, CredentialError> {
        self.issue_token(subject, DEFAULT_TTL_MINUTES, clock)
    }

    /// Verifies a raw credential value and returns the subject identifier.
    ///
    /// Accepts the bare token or an HTTP `Authorization` header value with a
    /// `Bearer ` prefix. The subject is not checked for existence; callers
    /// resolve it against the identity store.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Expired`] when the expiry has passed,
    /// [`CredentialError::InvalidSubject`] when the subject claim is absent
    /// or malformed, and [`CredentialError::InvalidToken`] for any other
    /// verification failure (tampered signature, malformed token).
    pub fn authenticate(&self, raw_credential: &str) -> Result<UserId, CredentialError> {
        let token = raw_credential
            .strip_prefix("Bearer ")
            .unwrap_or(raw_credential)
            .trim();

        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => CredentialError::Expired,
                _ => CredentialError::InvalidToken,
            }
        })?;

        let subject = data
            .claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or(CredentialError::InvalidSubject)?;
        let uuid = Uuid::parse_str(&subject).map_err(|_| CredentialError::InvalidSubject)?;
        Ok(UserId::from_uuid(uuid))
    }
}
