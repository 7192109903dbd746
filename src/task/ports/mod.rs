//! Port contracts for task, integration, and event persistence.

pub mod events;
pub mod registry;
pub mod repository;

pub use events::{EventRepository, EventRepositoryError, EventRepositoryResult};
pub use registry::{IntegrationRepository, IntegrationRepositoryError, IntegrationRepositoryResult};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
