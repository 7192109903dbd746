//! Project aggregate root.

use super::{ProjectDescription, ProjectId, ProjectName};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Project aggregate root.
///
/// The owner is fixed at creation; name and description are mutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: ProjectName,
    owner: UserId,
    description: Option<ProjectDescription>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted project name.
    pub name: ProjectName,
    /// Persisted owner identifier.
    pub owner: UserId,
    /// Persisted description, if any.
    pub description: Option<ProjectDescription>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project for the given owner.
    #[must_use]
    pub fn new(
        name: ProjectName,
        owner: UserId,
        description: Option<ProjectDescription>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: ProjectId::new(),
            name,
            owner,
            description,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            owner: data.owner,
            description: data.description,
            created_at: data.created_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the owner identifier.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_ref().map(ProjectDescription::as_str)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the project name.
    pub fn set_name(&mut self, name: ProjectName) {
        self.name = name;
    }

    /// Returns a mutable slot for the description, used by patch
    /// application.
    pub const fn description_mut(&mut self) -> &mut Option<ProjectDescription> {
        &mut self.description
    }
}
