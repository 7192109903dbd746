//! In-memory integration registry for tests and reference behaviour.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{ExternalRepoId, Integration, IntegrationId, Source},
    ports::{IntegrationRepository, IntegrationRepositoryError, IntegrationRepositoryResult},
};

/// Thread-safe in-memory integration registry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIntegrationRegistry {
    state: Arc<RwLock<HashMap<IntegrationId, Integration>>>,
}

impl InMemoryIntegrationRegistry {
    /// Creates an empty in-memory registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> IntegrationRepositoryError {
    IntegrationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl IntegrationRepository for InMemoryIntegrationRegistry {
    async fn store(&self, integration: &Integration) -> IntegrationRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.contains_key(&integration.id()) {
            return Err(IntegrationRepositoryError::DuplicateIntegration(
                integration.id(),
            ));
        }
        state.insert(integration.id(), integration.clone());
        Ok(())
    }

    async fn update(&self, integration: &Integration) -> IntegrationRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.contains_key(&integration.id()) {
            return Err(IntegrationRepositoryError::NotFound(integration.id()));
        }
        state.insert(integration.id(), integration.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: IntegrationId,
    ) -> IntegrationRepositoryResult<Option<Integration>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn find_enabled(
        &self,
        kind: &Source,
        external_id: &ExternalRepoId,
    ) -> IntegrationRepositoryResult<Option<Integration>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .values()
            .find(|integration| {
                integration.enabled()
                    && integration.kind() == kind
                    && integration.external_id() == external_id
            })
            .cloned())
    }

    async fn delete(&self, id: IntegrationId) -> IntegrationRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(IntegrationRepositoryError::NotFound(id))
    }
}
