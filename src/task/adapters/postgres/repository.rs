//! `PostgreSQL` store implementation for tasks and their audit events.

use super::{
    models::{EventRow, NewEventRow, NewTaskRow, TaskRow},
    schema::{events, tasks},
};
use crate::identity::domain::UserId;
use crate::project::domain::ProjectId;
use crate::task::{
    domain::{
        Event, EventId, EventKind, ExternalTaskRef, PersistedTaskData, Task, TaskDescription,
        TaskId, TaskStatus, TaskTitle,
    },
    ports::{
        EventRepository, EventRepositoryError, EventRepositoryResult, TaskRepository,
        TaskRepositoryError, TaskRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Unique index guarding the (source, external id) pair on `tasks`.
const EXTERNAL_REF_CONSTRAINT: &str = "idx_tasks_external_ref_unique";

/// `PostgreSQL`-backed task and event store.
///
/// One type serves both ports because tasks and events live in the same
/// schema and task deletion cascades to the event log.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<PoolError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(|err| E::from(PoolError::Checkout(err)))?;
            f(&mut connection)
        })
        .await
        .map_err(|err| E::from(PoolError::Join(err)))?
    }
}

/// Infrastructure failures shared by both port implementations.
#[derive(Debug, thiserror::Error)]
enum PoolError {
    /// Could not check a connection out of the pool.
    #[error("connection checkout failed: {0}")]
    Checkout(#[source] diesel::r2d2::PoolError),

    /// The blocking task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[source] tokio::task::JoinError),
}

impl From<PoolError> for TaskRepositoryError {
    fn from(err: PoolError) -> Self {
        Self::persistence(err)
    }
}

impl From<PoolError> for EventRepositoryError {
    fn from(err: PoolError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskStore {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let external_ref = task.external_ref().cloned();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_unique_violation(err, task_id, external_ref.as_ref()))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let title = task.title().as_str().to_owned();
        let description = task.description().map(str::to_owned);
        let status = task.status().as_str().to_owned();
        let updated_at = task.updated_at();

        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set((
                    tasks::title.eq(title),
                    tasks::description.eq(description),
                    tasks::status.eq(status),
                    tasks::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_external_ref(
        &self,
        external_ref: &ExternalTaskRef,
    ) -> TaskRepositoryResult<Option<Task>> {
        let source = external_ref.source().as_str().to_owned();
        let external_id = external_ref.external_id().as_str().to_owned();

        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::source.eq(source))
                .filter(tasks::external_id.eq(external_id))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::project_id.eq(project_id.into_inner()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        // Events cascade through the foreign key on `events.task_id`.
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl EventRepository for PostgresTaskStore {
    async fn append(&self, event: &Event) -> EventRepositoryResult<()> {
        let task_id = event.task_id();
        let new_row = NewEventRow {
            id: event.id().into_inner(),
            task_id: task_id.into_inner(),
            event_type: event.kind().as_str().to_owned(),
            payload: event.payload().clone(),
            created_at: event.created_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(events::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        EventRepositoryError::UnknownTask(task_id)
                    }
                    other => EventRepositoryError::persistence(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn list_for_task(&self, task_id: TaskId) -> EventRepositoryResult<Vec<Event>> {
        self.run_blocking(move |connection| {
            let rows = events::table
                .filter(events::task_id.eq(task_id.into_inner()))
                .order(events::created_at.asc())
                .select(EventRow::as_select())
                .load::<EventRow>(connection)
                .map_err(EventRepositoryError::persistence)?;
            rows.into_iter().map(row_to_event).collect()
        })
        .await
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        project_id: task.project_id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        source: task
            .external_ref()
            .map(|external_ref| external_ref.source().as_str().to_owned()),
        external_id: task
            .external_ref()
            .map(|external_ref| external_ref.external_id().as_str().to_owned()),
        created_by: task.created_by().map(UserId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        project_id,
        title: persisted_title,
        description: persisted_description,
        status: persisted_status,
        source,
        external_id,
        created_by,
        created_at,
        updated_at,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskRepositoryError::persistence)?;
    let description = persisted_description
        .map(TaskDescription::new)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;
    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let external_ref = match (source, external_id) {
        (Some(persisted_source), Some(persisted_external_id)) => Some(
            ExternalTaskRef::from_parts(persisted_source, persisted_external_id)
                .map_err(TaskRepositoryError::persistence)?,
        ),
        _ => None,
    };

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        project_id: ProjectId::from_uuid(project_id),
        title,
        description,
        status,
        external_ref,
        created_by: created_by.map(UserId::from_uuid),
        created_at,
        updated_at,
    }))
}

fn row_to_event(row: EventRow) -> EventRepositoryResult<Event> {
    let EventRow {
        id,
        task_id,
        event_type,
        payload,
        created_at,
    } = row;

    let kind =
        EventKind::try_from(event_type.as_str()).map_err(EventRepositoryError::persistence)?;
    Ok(Event::from_persisted(
        EventId::from_uuid(id),
        TaskId::from_uuid(task_id),
        kind,
        payload,
        created_at,
    ))
}

/// Maps unique-constraint violations to semantic duplicate errors by
/// constraint name; anything else becomes a persistence error.
fn map_unique_violation(
    err: DieselError,
    task_id: TaskId,
    external_ref: Option<&ExternalTaskRef>,
) -> TaskRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_constraint(info.as_ref(), EXTERNAL_REF_CONSTRAINT) =>
        {
            external_ref.map_or_else(
                || TaskRepositoryError::DuplicateTask(task_id),
                |found| TaskRepositoryError::DuplicateExternalRef(found.clone()),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            TaskRepositoryError::DuplicateTask(task_id)
        }
        _ => TaskRepositoryError::persistence(err),
    }
}

fn is_constraint(info: &dyn DatabaseErrorInformation, name: &str) -> bool {
    info.constraint_name().is_some_and(|found| found == name)
}
