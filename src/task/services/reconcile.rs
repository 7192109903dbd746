//! Reconciliation of external system events against the task store.
//!
//! Events address tasks by (source, external task id). The reconciler
//! first resolves an enabled integration for the event's source and
//! external repository, then applies the event to the single task row
//! keyed by that reference.

use crate::task::{
    domain::{
        Event, EventKind, ExternalRepoId, ExternalTaskRef, Integration, Source, Task,
        TaskDescription, TaskDomainError, TaskStatus, TaskTitle,
    },
    ports::{
        EventRepository, EventRepositoryError, IntegrationRepository, IntegrationRepositoryError,
        TaskRepository, TaskRepositoryError,
    },
};
use mockable::Clock;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// An external system's create-or-update notification for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTaskChange {
    source: String,
    external_repo_id: String,
    external_task_id: String,
    title: String,
    description: Option<String>,
}

impl ExternalTaskChange {
    /// Creates a change notification with required fields.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        external_repo_id: impl Into<String>,
        external_task_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            external_repo_id: external_repo_id.into(),
            external_task_id: external_task_id.into(),
            title: title.into(),
            description: None,
        }
    }

    /// Sets the task description carried by the notification.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An external system's status-change notification for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalStatusChange {
    source: String,
    external_repo_id: String,
    external_task_id: String,
    status: String,
}

impl ExternalStatusChange {
    /// Creates a status-change notification.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        external_repo_id: impl Into<String>,
        external_task_id: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            external_repo_id: external_repo_id.into(),
            external_task_id: external_task_id.into(),
            status: status.into(),
        }
    }
}

/// Service-level errors for reconciliation.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The notification carried an unknown status value.
    #[error("unknown task status: {0}")]
    UnknownStatus(String),

    /// No enabled integration matches the event's source and repository.
    #[error("no enabled integration for source '{source}' and repository '{repository}'")]
    IntegrationNotFound {
        /// Source tag the event named.
        source: Source,
        /// External repository the event named.
        repository: ExternalRepoId,
    },

    /// No task carries the event's external reference.
    #[error("no task for external reference {0}")]
    TaskNotFound(ExternalTaskRef),

    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Integration lookup failed.
    #[error(transparent)]
    Integrations(#[from] IntegrationRepositoryError),

    /// Audit event could not be recorded.
    #[error(transparent)]
    Events(#[from] EventRepositoryError),
}

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// External-sync reconciliation service.
#[derive(Clone)]
pub struct ReconcileService<T, I, E, C>
where
    T: TaskRepository,
    I: IntegrationRepository,
    E: EventRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    integrations: Arc<I>,
    events: Arc<E>,
    clock: Arc<C>,
}

impl<T, I, E, C> ReconcileService<T, I, E, C>
where
    T: TaskRepository,
    I: IntegrationRepository,
    E: EventRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new reconciliation service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, integrations: Arc<I>, events: Arc<E>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            integrations,
            events,
            clock,
        }
    }

    /// Creates or updates a task from an external notification.
    ///
    /// When no task carries the notification's (source, external task id)
    /// reference, a task is created under the integration's project with
    /// status [`TaskStatus::Todo`] and an `external.created` event is
    /// recorded. When the reference is already mapped, title and
    /// description are overwritten in place (status untouched) and an
    /// `external.updated` event is recorded.
    ///
    /// A duplicate-reference conflict from the store means another writer
    /// created the task between lookup and insert; the change is then
    /// re-applied as an update.
    ///
    /// The insert and its audit event are separate repository calls, so a
    /// persistence failure between the two leaves the created task
    /// committed without its `external.created` entry. The per-call
    /// transaction model does not span both writes.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::IntegrationNotFound`] when no enabled
    /// integration matches, [`ReconcileError::Domain`] when the
    /// notification's fields fail validation, or a repository error when
    /// persistence fails.
    pub async fn upsert_from_external(
        &self,
        change: ExternalTaskChange,
    ) -> ReconcileResult<Task> {
        let source = Source::new(change.source)?;
        let repository = ExternalRepoId::new(change.external_repo_id)?;
        let title = TaskTitle::new(change.title)?;
        let description = change.description.map(TaskDescription::new).transpose()?;

        let integration = self.resolve_integration(&source, &repository).await?;
        let external_ref = ExternalTaskRef::from_parts(
            source.as_str(),
            change.external_task_id,
        )?;

        if let Some(existing) = self.tasks.find_by_external_ref(&external_ref).await? {
            return self
                .apply_update(existing, title, description, &external_ref)
                .await;
        }

        let task = Task::new_from_external(
            integration.project_id(),
            external_ref.clone(),
            title.clone(),
            description.clone(),
            &*self.clock,
        );
        match self.tasks.store(&task).await {
            Ok(()) => {
                self.record(&task, EventKind::ExternalCreated).await?;
                Ok(task)
            }
            Err(TaskRepositoryError::DuplicateExternalRef(_)) => {
                // Lost the race to a concurrent creator; the reference now
                // maps to a row, so re-apply the change as an update.
                let existing = self
                    .tasks
                    .find_by_external_ref(&external_ref)
                    .await?
                    .ok_or_else(|| ReconcileError::TaskNotFound(external_ref.clone()))?;
                self.apply_update(existing, title, description, &external_ref)
                    .await
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Overwrites a task's status from an external notification.
    ///
    /// Only the status and `updated_at` change; an
    /// `external.status_changed` event is recorded with the new status.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::IntegrationNotFound`] when no enabled
    /// integration matches, [`ReconcileError::TaskNotFound`] when the
    /// reference is unmapped (status changes never create tasks), and
    /// [`ReconcileError::UnknownStatus`] when the status value does not
    /// parse.
    pub async fn update_status_from_external(
        &self,
        change: ExternalStatusChange,
    ) -> ReconcileResult<Task> {
        let source = Source::new(change.source)?;
        let repository = ExternalRepoId::new(change.external_repo_id)?;
        let status = TaskStatus::try_from(change.status.as_str())
            .map_err(|err| ReconcileError::UnknownStatus(err.0))?;

        self.resolve_integration(&source, &repository).await?;
        let external_ref =
            ExternalTaskRef::from_parts(source.as_str(), change.external_task_id)?;

        let mut task = self
            .tasks
            .find_by_external_ref(&external_ref)
            .await?
            .ok_or_else(|| ReconcileError::TaskNotFound(external_ref.clone()))?;

        task.set_status(status, &*self.clock);
        self.tasks.update(&task).await?;

        let event = Event::record(
            task.id(),
            EventKind::ExternalStatusChanged,
            json!({ "status": status.as_str() }),
            &*self.clock,
        );
        self.events.append(&event).await?;
        Ok(task)
    }

    /// Deletes a task in response to an external notification.
    ///
    /// The task's audit events are removed with it; no event is recorded
    /// for the deletion itself.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::IntegrationNotFound`] when no enabled
    /// integration matches and [`ReconcileError::TaskNotFound`] when the
    /// reference is unmapped.
    pub async fn delete_from_external(
        &self,
        source: impl Into<String> + Send,
        external_repo_id: impl Into<String> + Send,
        external_task_id: impl Into<String> + Send,
    ) -> ReconcileResult<()> {
        let source = Source::new(source)?;
        let repository = ExternalRepoId::new(external_repo_id)?;

        self.resolve_integration(&source, &repository).await?;
        let external_ref = ExternalTaskRef::from_parts(source.as_str(), external_task_id)?;

        let task = self
            .tasks
            .find_by_external_ref(&external_ref)
            .await?
            .ok_or_else(|| ReconcileError::TaskNotFound(external_ref.clone()))?;

        self.tasks.delete(task.id()).await?;
        Ok(())
    }

    async fn resolve_integration(
        &self,
        source: &Source,
        repository: &ExternalRepoId,
    ) -> ReconcileResult<Integration> {
        self.integrations
            .find_enabled(source, repository)
            .await?
            .ok_or_else(|| ReconcileError::IntegrationNotFound {
                source: source.clone(),
                repository: repository.clone(),
            })
    }

    async fn apply_update(
        &self,
        mut task: Task,
        title: TaskTitle,
        description: Option<TaskDescription>,
        external_ref: &ExternalTaskRef,
    ) -> ReconcileResult<Task> {
        task.sync_external(title, description, &*self.clock);
        match self.tasks.update(&task).await {
            Ok(()) => {}
            Err(TaskRepositoryError::NotFound(_)) => {
                // Deleted underneath us between lookup and write.
                return Err(ReconcileError::TaskNotFound(external_ref.clone()));
            }
            Err(other) => return Err(other.into()),
        }
        self.record(&task, EventKind::ExternalUpdated).await?;
        Ok(task)
    }

    async fn record(&self, task: &Task, kind: EventKind) -> ReconcileResult<()> {
        let payload = task.external_ref().map_or_else(
            || json!({}),
            |external_ref| {
                json!({
                    "source": external_ref.source().as_str(),
                    "external_id": external_ref.external_id().as_str(),
                })
            },
        );
        let event = Event::record(task.id(), kind, payload, &*self.clock);
        self.events.append(&event).await?;
        Ok(())
    }
}
