//! Domain model for tasks, integrations, and audit events.

mod error;
mod event;
mod ids;
mod integration;
mod task;

pub use error::{ParseEventKindError, ParseTaskStatusError, TaskDomainError};
pub use event::{Event, EventId, EventKind};
pub use ids::{ExternalRepoId, ExternalTaskId, ExternalTaskRef, IntegrationId, Source, TaskId};
pub use integration::{Integration, PersistedIntegrationData};
pub use task::{PersistedTaskData, Task, TaskDescription, TaskStatus, TaskTitle};
