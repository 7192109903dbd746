//! Repository port for integration configurations.

use crate::task::domain::{ExternalRepoId, Integration, IntegrationId, Source};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for integration repository operations.
pub type IntegrationRepositoryResult<T> = Result<T, IntegrationRepositoryError>;

/// Integration persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IntegrationRepository: Send + Sync {
    /// Stores a new integration.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRepositoryError::DuplicateIntegration`] when
    /// the identifier already exists.
    async fn store(&self, integration: &Integration) -> IntegrationRepositoryResult<()>;

    /// Persists changes to an existing integration (external id, config,
    /// enabled flag).
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRepositoryError::NotFound`] when the
    /// integration does not exist.
    async fn update(&self, integration: &Integration) -> IntegrationRepositoryResult<()>;

    /// Finds an integration by identifier.
    ///
    /// Returns `None` when the integration does not exist.
    async fn find_by_id(
        &self,
        id: IntegrationId,
    ) -> IntegrationRepositoryResult<Option<Integration>>;

    /// Finds the first enabled integration bound to the given source and
    /// external repository.
    ///
    /// Disabled integrations never match; a matching-but-disabled binding
    /// is indistinguishable from an absent one.
    async fn find_enabled(
        &self,
        kind: &Source,
        external_id: &ExternalRepoId,
    ) -> IntegrationRepositoryResult<Option<Integration>>;

    /// Deletes an integration row.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRepositoryError::NotFound`] when the
    /// integration does not exist.
    async fn delete(&self, id: IntegrationId) -> IntegrationRepositoryResult<()>;
}

/// Errors returned by integration repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IntegrationRepositoryError {
    /// An integration with the same identifier already exists.
    #[error("duplicate integration identifier: {0}")]
    DuplicateIntegration(IntegrationId),

    /// The integration was not found.
    #[error("integration not found: {0}")]
    NotFound(IntegrationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IntegrationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
