//! `PostgreSQL` adapters for task, integration, and event persistence.

mod models;
mod registry;
mod repository;
mod schema;

pub use registry::PostgresIntegrationRegistry;
pub use repository::{PostgresTaskStore, TaskPgPool};
