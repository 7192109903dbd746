//! Integration aggregate: a binding between a project and an external
//! system's repository.

use super::{ExternalRepoId, IntegrationId, Source};
use crate::project::domain::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configured binding between a project and an external repository, scoped
/// by (source, external repository id).
///
/// At most one *enabled* integration should exist per pair; the reconciler
/// takes the first enabled match, so a second enabled binding for the same
/// pair is a configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    id: IntegrationId,
    project_id: ProjectId,
    kind: Source,
    external_id: ExternalRepoId,
    config: Value,
    enabled: bool,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedIntegrationData {
    /// Persisted integration identifier.
    pub id: IntegrationId,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted source tag.
    pub kind: Source,
    /// Persisted external repository identifier.
    pub external_id: ExternalRepoId,
    /// Persisted configuration payload.
    pub config: Value,
    /// Persisted enabled flag.
    pub enabled: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Integration {
    /// Creates a new integration for a project.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        kind: Source,
        external_id: ExternalRepoId,
        config: Value,
        enabled: bool,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: IntegrationId::new(),
            project_id,
            kind,
            external_id,
            config,
            enabled,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an integration from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIntegrationData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            kind: data.kind,
            external_id: data.external_id,
            config: data.config,
            enabled: data.enabled,
            created_at: data.created_at,
        }
    }

    /// Returns the integration identifier.
    #[must_use]
    pub const fn id(&self) -> IntegrationId {
        self.id
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the source tag this integration listens for.
    #[must_use]
    pub const fn kind(&self) -> &Source {
        &self.kind
    }

    /// Returns the bound external repository identifier.
    #[must_use]
    pub const fn external_id(&self) -> &ExternalRepoId {
        &self.external_id
    }

    /// Returns the configuration payload.
    #[must_use]
    pub const fn config(&self) -> &Value {
        &self.config
    }

    /// Returns whether the integration is enabled.
    ///
    /// A disabled integration is indistinguishable from an absent one
    /// during reconciliation.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Rebinds the integration to another external repository.
    pub fn set_external_id(&mut self, external_id: ExternalRepoId) {
        self.external_id = external_id;
    }

    /// Replaces the configuration payload.
    pub fn set_config(&mut self, config: Value) {
        self.config = config;
    }

    /// Enables or disables the integration.
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
