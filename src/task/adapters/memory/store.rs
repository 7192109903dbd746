//! In-memory task and event store for tests and reference behaviour.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::domain::ProjectId;
use crate::task::{
    domain::{Event, ExternalTaskRef, Task, TaskId},
    ports::{
        EventRepository, EventRepositoryError, EventRepositoryResult, TaskRepository,
        TaskRepositoryError, TaskRepositoryResult,
    },
};

/// Thread-safe in-memory task and event store.
///
/// Tasks and their audit events share one state so task deletion cascades
/// events, matching the relational schema's `ON DELETE CASCADE`. The
/// external-reference index enforces the same uniqueness as the schema's
/// unique constraint on (source, external id).
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    external_index: HashMap<ExternalTaskRef, TaskId>,
    events: HashMap<TaskId, Vec<Event>>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn task_lock_error(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn event_lock_error(err: impl ToString) -> EventRepositoryError {
    EventRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskStore {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(task_lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        if let Some(external_ref) = task.external_ref() {
            if state.external_index.contains_key(external_ref) {
                return Err(TaskRepositoryError::DuplicateExternalRef(
                    external_ref.clone(),
                ));
            }
            state.external_index.insert(external_ref.clone(), task.id());
        }

        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(task_lock_error)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(task_lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_external_ref(
        &self,
        external_ref: &ExternalTaskRef,
    ) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(task_lock_error)?;
        let task = state
            .external_index
            .get(external_ref)
            .and_then(|task_id| state.tasks.get(task_id))
            .cloned();
        Ok(task)
    }

    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(task_lock_error)?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.project_id() == project_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(task_lock_error)?;
        let task = state
            .tasks
            .remove(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        if let Some(external_ref) = task.external_ref() {
            state.external_index.remove(external_ref);
        }
        // Audit events cascade with their task.
        state.events.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl EventRepository for InMemoryTaskStore {
    async fn append(&self, event: &Event) -> EventRepositoryResult<()> {
        let mut state = self.state.write().map_err(event_lock_error)?;
        if !state.tasks.contains_key(&event.task_id()) {
            return Err(EventRepositoryError::UnknownTask(event.task_id()));
        }
        state
            .events
            .entry(event.task_id())
            .or_default()
            .push(event.clone());
        Ok(())
    }

    async fn list_for_task(&self, task_id: TaskId) -> EventRepositoryResult<Vec<Event>> {
        let state = self.state.read().map_err(event_lock_error)?;
        Ok(state.events.get(&task_id).cloned().unwrap_or_default())
    }
}
