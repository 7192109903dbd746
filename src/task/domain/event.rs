//! Append-only audit events recorded against tasks.

use super::{ParseEventKindError, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an event identifier from an existing UUID.
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

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of audit event the reconciler records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A task was created from an external event.
    ExternalCreated,
    /// Title and description were overwritten from an external event.
    ExternalUpdated,
    /// The status was overwritten from an external event.
    ExternalStatusChanged,
}

impl EventKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExternalCreated => "external.created",
            Self::ExternalUpdated => "external.updated",
            Self::ExternalStatusChanged => "external.status_changed",
        }
    }
}

impl TryFrom<&str> for EventKind {
    type Error = ParseEventKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "external.created" => Ok(Self::ExternalCreated),
            "external.updated" => Ok(Self::ExternalUpdated),
            "external.status_changed" => Ok(Self::ExternalStatusChanged),
            _ => Err(ParseEventKindError(value.to_owned())),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Append-only audit log entry.
///
/// Entries are recorded once and never mutated; they are removed only when
/// their task is deleted (the events cascade with the row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    task_id: TaskId,
    kind: EventKind,
    payload: Value,
    created_at: DateTime<Utc>,
}

impl Event {
    /// Records a new audit event for a task.
    #[must_use]
    pub fn record(task_id: TaskId, kind: EventKind, payload: Value, clock: &impl Clock) -> Self {
        Self {
            id: EventId::new(),
            task_id,
            kind,
            payload,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an event from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: EventId,
        task_id: TaskId,
        kind: EventKind,
        payload: Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            kind,
            payload,
            created_at,
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Returns the task this event belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the event kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// Returns the event payload.
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
