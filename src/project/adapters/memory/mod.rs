//! In-memory adapters for project ports.

mod project;

pub use project::InMemoryProjectRepository;
