//! Repository port for the append-only audit event log.

use crate::task::domain::{Event, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for event repository operations.
pub type EventRepositoryResult<T> = Result<T, EventRepositoryError>;

/// Audit event persistence contract.
///
/// The log is append-only: entries are never updated, and they disappear
/// only when their task is deleted (foreign-key cascade).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Appends an audit event.
    ///
    /// # Errors
    ///
    /// Returns [`EventRepositoryError::UnknownTask`] when the referenced
    /// task does not exist.
    async fn append(&self, event: &Event) -> EventRepositoryResult<()>;

    /// Returns all events recorded for a task, oldest first.
    async fn list_for_task(&self, task_id: TaskId) -> EventRepositoryResult<Vec<Event>>;
}

/// Errors returned by event repository implementations.
#[derive(Debug, Clone, Error)]
pub enum EventRepositoryError {
    /// The referenced task does not exist.
    #[error("unknown task for event: {0}")]
    UnknownTask(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl EventRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
