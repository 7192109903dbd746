//! In-memory adapters for task, integration, and event ports.

mod registry;
mod store;

pub use registry::InMemoryIntegrationRegistry;
pub use store::InMemoryTaskStore;
