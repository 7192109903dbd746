//! Service layer for integration registration and maintenance.

use crate::project::domain::ProjectId;
use crate::task::{
    domain::{ExternalRepoId, Integration, IntegrationId, Source, TaskDomainError},
    ports::{IntegrationRepository, IntegrationRepositoryError},
};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering an integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterIntegrationRequest {
    project_id: ProjectId,
    kind: String,
    external_id: String,
    config: Value,
    enabled: bool,
}

impl RegisterIntegrationRequest {
    /// Creates a request with required fields.
    ///
    /// The integration starts enabled with an empty configuration object.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        kind: impl Into<String>,
        external_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id,
            kind: kind.into(),
            external_id: external_id.into(),
            config: Value::Object(serde_json::Map::new()),
            enabled: true,
        }
    }

    /// Sets the configuration payload.
    #[must_use]
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    /// Sets the enabled flag.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Partial update for an integration.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateIntegrationRequest {
    external_id: Option<String>,
    config: Option<Value>,
    enabled: Option<bool>,
}

impl UpdateIntegrationRequest {
    /// Creates an empty update request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the integration be rebound to another external repository.
    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Requests a configuration replacement.
    #[must_use]
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    /// Requests the enabled flag be set.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }
}

/// Service-level errors for integration operations.
#[derive(Debug, Error)]
pub enum IntegrationServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The integration was not found.
    #[error("integration not found: {0}")]
    NotFound(IntegrationId),

    /// Integration repository operation failed.
    #[error(transparent)]
    Repository(#[from] IntegrationRepositoryError),
}

/// Result type for integration service operations.
pub type IntegrationServiceResult<T> = Result<T, IntegrationServiceError>;

/// Integration orchestration service.
#[derive(Clone)]
pub struct IntegrationService<I, C>
where
    I: IntegrationRepository,
    C: Clock + Send + Sync,
{
    integrations: Arc<I>,
    clock: Arc<C>,
}

impl<I, C> IntegrationService<I, C>
where
    I: IntegrationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new integration service.
    #[must_use]
    pub const fn new(integrations: Arc<I>, clock: Arc<C>) -> Self {
        Self {
            integrations,
            clock,
        }
    }

    /// Registers an integration binding a project to an external
    /// repository.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationServiceError::Domain`] when the source tag or
    /// external identifier fails validation, or a repository error when
    /// persistence fails.
    pub async fn register(
        &self,
        request: RegisterIntegrationRequest,
    ) -> IntegrationServiceResult<Integration> {
        let kind = Source::new(request.kind)?;
        let external_id = ExternalRepoId::new(request.external_id)?;
        let integration = Integration::new(
            request.project_id,
            kind,
            external_id,
            request.config,
            request.enabled,
            &*self.clock,
        );
        self.integrations.store(&integration).await?;
        Ok(integration)
    }

    /// Retrieves an integration by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationServiceError::NotFound`] when the integration
    /// does not exist.
    pub async fn get(&self, id: IntegrationId) -> IntegrationServiceResult<Integration> {
        self.integrations
            .find_by_id(id)
            .await?
            .ok_or(IntegrationServiceError::NotFound(id))
    }

    /// Applies a partial update to an integration.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationServiceError::NotFound`] when the integration
    /// does not exist or [`IntegrationServiceError::Domain`] when a
    /// provided external identifier fails validation.
    pub async fn update(
        &self,
        id: IntegrationId,
        request: UpdateIntegrationRequest,
    ) -> IntegrationServiceResult<Integration> {
        let mut integration = self.get(id).await?;

        if let Some(external_id) = request.external_id {
            integration.set_external_id(ExternalRepoId::new(external_id)?);
        }
        if let Some(config) = request.config {
            integration.set_config(config);
        }
        if let Some(enabled) = request.enabled {
            integration.set_enabled(enabled);
        }

        self.integrations.update(&integration).await?;
        Ok(integration)
    }

    /// Deletes an integration.
    ///
    /// Tasks already synced through the integration are left in place;
    /// future events for its (source, repository) pair stop matching.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationServiceError::NotFound`] when the integration
    /// does not exist.
    pub async fn delete(&self, id: IntegrationId) -> IntegrationServiceResult<()> {
        match self.integrations.delete(id).await {
            Ok(()) => Ok(()),
            Err(IntegrationRepositoryError::NotFound(missing)) => {
                Err(IntegrationServiceError::NotFound(missing))
            }
            Err(other) => Err(other.into()),
        }
    }
}
