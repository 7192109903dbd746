//! Diesel row models for task, integration, and event persistence.

use super::schema::{events, integrations, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Source tag of the origin system, if externally synced.
    pub source: Option<String>,
    /// Task identifier within the origin system, if externally synced.
    pub external_id: Option<String>,
    /// Creating user, if created by hand.
    pub created_by: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Source tag of the origin system, if externally synced.
    pub source: Option<String>,
    /// Task identifier within the origin system, if externally synced.
    pub external_id: Option<String>,
    /// Creating user, if created by hand.
    pub created_by: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for integration records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = integrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IntegrationRow {
    /// Internal integration identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Source tag the integration listens for.
    pub kind: String,
    /// External repository identifier.
    pub external_id: String,
    /// Configuration payload.
    pub config: Value,
    /// Whether the integration participates in reconciliation.
    pub enabled: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for integration records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = integrations)]
pub struct NewIntegrationRow {
    /// Internal integration identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Source tag the integration listens for.
    pub kind: String,
    /// External repository identifier.
    pub external_id: String,
    /// Configuration payload.
    pub config: Value,
    /// Whether the integration participates in reconciliation.
    pub enabled: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for audit event records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EventRow {
    /// Internal event identifier.
    pub id: uuid::Uuid,
    /// Task the event belongs to.
    pub task_id: uuid::Uuid,
    /// Event kind tag.
    pub event_type: String,
    /// Event payload.
    pub payload: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for audit event records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub struct NewEventRow {
    /// Internal event identifier.
    pub id: uuid::Uuid,
    /// Task the event belongs to.
    pub task_id: uuid::Uuid,
    /// Event kind tag.
    pub event_type: String,
    /// Event payload.
    pub payload: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
