//! Service layer for project creation, retrieval, and maintenance.

use crate::identity::domain::UserId;
use crate::patch::PatchField;
use crate::project::{
    domain::{Project, ProjectDescription, ProjectDomainError, ProjectId, ProjectName},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    owner: UserId,
    description: Option<String>,
}

impl CreateProjectRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, owner: UserId) -> Self {
        Self {
            name: name.into(),
            owner,
            description: None,
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update for a project.
///
/// The description is a three-state patch so "leave unchanged" and "clear"
/// are distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProjectRequest {
    name: Option<String>,
    description: PatchField<String>,
}

impl UpdateProjectRequest {
    /// Creates an empty update request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a name change.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Requests a description change.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = PatchField::Set(description.into());
        self
    }

    /// Requests the description be cleared.
    #[must_use]
    pub fn clearing_description(mut self) -> Self {
        self.description = PatchField::Clear;
        self
    }
}

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),

    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// The project still contains tasks and cannot be deleted.
    #[error("project {0} still contains tasks")]
    HasTasks(ProjectId),

    /// Project repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),

    /// Task lookup failed while checking the deletion policy.
    #[error("task lookup failed: {0}")]
    Tasks(#[from] TaskRepositoryError),
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project orchestration service.
#[derive(Clone)]
pub struct ProjectService<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<P, T, C> ProjectService<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(projects: Arc<P>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            projects,
            tasks,
            clock,
        }
    }

    /// Creates a new project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Domain`] when the name or
    /// description fails validation, or a repository error when
    /// persistence fails.
    pub async fn create(&self, request: CreateProjectRequest) -> ProjectServiceResult<Project> {
        let name = ProjectName::new(request.name)?;
        let description = request
            .description
            .map(ProjectDescription::new)
            .transpose()?;
        let project = Project::new(name, request.owner, description, &*self.clock);
        self.projects.store(&project).await?;
        Ok(project)
    }

    /// Retrieves a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] when the project does not
    /// exist.
    pub async fn get(&self, id: ProjectId) -> ProjectServiceResult<Project> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or(ProjectServiceError::NotFound(id))
    }

    /// Applies a partial update to a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] when the project does not
    /// exist or [`ProjectServiceError::Domain`] when a provided name or
    /// description fails validation.
    pub async fn update(
        &self,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let mut project = self.get(id).await?;

        if let Some(name) = request.name {
            project.set_name(ProjectName::new(name)?);
        }
        let description = request.description.try_map(ProjectDescription::new)?;
        description.apply(project.description_mut());

        self.projects.update(&project).await?;
        Ok(project)
    }

    /// Deletes a project.
    ///
    /// Deletion is restricted: projects that still contain tasks cannot be
    /// removed. Callers must delete or move the tasks first (externally
    /// synced tasks are removed through the reconciler).
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] when the project does not
    /// exist and [`ProjectServiceError::HasTasks`] when tasks remain.
    pub async fn delete(&self, id: ProjectId) -> ProjectServiceResult<()> {
        if self.projects.find_by_id(id).await?.is_none() {
            return Err(ProjectServiceError::NotFound(id));
        }

        let tasks = self.tasks.find_by_project(id).await?;
        if !tasks.is_empty() {
            return Err(ProjectServiceError::HasTasks(id));
        }

        self.projects.delete(id).await?;
        Ok(())
    }
}
