//! Domain model for projects.

mod error;
mod ids;
mod project;

pub use error::ProjectDomainError;
pub use ids::{ProjectDescription, ProjectId, ProjectName};
pub use project::{PersistedProjectData, Project};
