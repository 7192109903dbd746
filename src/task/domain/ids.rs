//! Identifier and validated scalar types for the task domain.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an internal task record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new random task identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a task identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for TaskId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an integration configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntegrationId(Uuid);

impl IntegrationId {
    /// Creates a new random integration identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an integration identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for IntegrationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IntegrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum persisted length for source tags and external identifiers.
const EXTERNAL_VALUE_MAX_LENGTH: usize = 100;

/// Normalized tag naming an external system (e.g. `github`).
///
/// Stored lowercase so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Source(String);

impl Source {
    /// Creates a validated source tag.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidSource`] when the value is empty
    /// after trimming, longer than 100 characters, or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();
        let is_valid = !normalized.is_empty()
            && normalized.chars().count() <= EXTERNAL_VALUE_MAX_LENGTH
            && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(TaskDomainError::InvalidSource(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the source tag as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Source {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Required by `thiserror`: error variants holding a field named `source`
// (e.g. `ReconcileError::IntegrationNotFound`) must have that field
// implement `std::error::Error`.
impl std::error::Error for Source {}

/// External repository identifier an integration is bound to (e.g.
/// `acme/repo`).
///
/// The format is source-specific, so validation is limited to presence and
/// length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalRepoId(String);

impl ExternalRepoId {
    /// Creates a validated external repository identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidExternalId`] when the value is
    /// empty after trimming or longer than 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().count() > EXTERNAL_VALUE_MAX_LENGTH {
            return Err(TaskDomainError::InvalidExternalId(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ExternalRepoId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ExternalRepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External task identifier within the origin system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalTaskId(String);

impl ExternalTaskId {
    /// Creates a validated external task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidExternalId`] when the value is
    /// empty after trimming or longer than 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().count() > EXTERNAL_VALUE_MAX_LENGTH {
            return Err(TaskDomainError::InvalidExternalId(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ExternalTaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ExternalTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sync identity of a task: the (source, external task id) pair.
///
/// External events address tasks through this pair, never through the
/// internal [`TaskId`]. The persistence layer keeps it unique so a pair
/// maps to at most one task row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalTaskRef {
    source: Source,
    external_id: ExternalTaskId,
}

impl ExternalTaskRef {
    /// Creates an external task reference.
    #[must_use]
    pub const fn new(source: Source, external_id: ExternalTaskId) -> Self {
        Self {
            source,
            external_id,
        }
    }

    /// Creates a reference from raw parts.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when either part fails validation.
    pub fn from_parts(
        source: impl Into<String>,
        external_id: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self::new(
            Source::new(source)?,
            ExternalTaskId::new(external_id)?,
        ))
    }

    /// Returns the source tag.
    #[must_use]
    pub const fn source(&self) -> &Source {
        &self.source
    }

    /// Returns the external task identifier.
    #[must_use]
    pub const fn external_id(&self) -> &ExternalTaskId {
        &self.external_id
    }
}

impl fmt::Display for ExternalTaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.external_id)
    }
}
