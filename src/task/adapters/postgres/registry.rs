//! `PostgreSQL` repository implementation for integration configurations.

use super::{
    models::{IntegrationRow, NewIntegrationRow},
    repository::TaskPgPool,
    schema::integrations,
};
use crate::project::domain::ProjectId;
use crate::task::{
    domain::{
        ExternalRepoId, Integration, IntegrationId, PersistedIntegrationData, Source,
    },
    ports::{IntegrationRepository, IntegrationRepositoryError, IntegrationRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed integration registry.
#[derive(Debug, Clone)]
pub struct PostgresIntegrationRegistry {
    pool: TaskPgPool,
}

impl PostgresIntegrationRegistry {
    /// Creates a new registry from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> IntegrationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> IntegrationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(IntegrationRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(IntegrationRepositoryError::persistence)?
    }
}

#[async_trait]
impl IntegrationRepository for PostgresIntegrationRegistry {
    async fn store(&self, integration: &Integration) -> IntegrationRepositoryResult<()> {
        let integration_id = integration.id();
        let new_row = to_new_row(integration);

        self.run_blocking(move |connection| {
            diesel::insert_into(integrations::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        IntegrationRepositoryError::DuplicateIntegration(integration_id)
                    }
                    other => IntegrationRepositoryError::persistence(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, integration: &Integration) -> IntegrationRepositoryResult<()> {
        let integration_id = integration.id();
        let external_id = integration.external_id().as_str().to_owned();
        let config = integration.config().clone();
        let enabled = integration.enabled();

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                integrations::table.filter(integrations::id.eq(integration_id.into_inner())),
            )
            .set((
                integrations::external_id.eq(external_id),
                integrations::config.eq(config),
                integrations::enabled.eq(enabled),
            ))
            .execute(connection)
            .map_err(IntegrationRepositoryError::persistence)?;
            if updated == 0 {
                return Err(IntegrationRepositoryError::NotFound(integration_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: IntegrationId,
    ) -> IntegrationRepositoryResult<Option<Integration>> {
        self.run_blocking(move |connection| {
            let row = integrations::table
                .filter(integrations::id.eq(id.into_inner()))
                .select(IntegrationRow::as_select())
                .first::<IntegrationRow>(connection)
                .optional()
                .map_err(IntegrationRepositoryError::persistence)?;
            row.map(row_to_integration).transpose()
        })
        .await
    }

    async fn find_enabled(
        &self,
        kind: &Source,
        external_id: &ExternalRepoId,
    ) -> IntegrationRepositoryResult<Option<Integration>> {
        let kind_lookup = kind.as_str().to_owned();
        let repo_lookup = external_id.as_str().to_owned();

        self.run_blocking(move |connection| {
            let row = integrations::table
                .filter(integrations::kind.eq(kind_lookup))
                .filter(integrations::external_id.eq(repo_lookup))
                .filter(integrations::enabled.eq(true))
                .select(IntegrationRow::as_select())
                .first::<IntegrationRow>(connection)
                .optional()
                .map_err(IntegrationRepositoryError::persistence)?;
            row.map(row_to_integration).transpose()
        })
        .await
    }

    async fn delete(&self, id: IntegrationId) -> IntegrationRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted =
                diesel::delete(integrations::table.filter(integrations::id.eq(id.into_inner())))
                    .execute(connection)
                    .map_err(IntegrationRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(IntegrationRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn to_new_row(integration: &Integration) -> NewIntegrationRow {
    NewIntegrationRow {
        id: integration.id().into_inner(),
        project_id: integration.project_id().into_inner(),
        kind: integration.kind().as_str().to_owned(),
        external_id: integration.external_id().as_str().to_owned(),
        config: integration.config().clone(),
        enabled: integration.enabled(),
        created_at: integration.created_at(),
    }
}

fn row_to_integration(row: IntegrationRow) -> IntegrationRepositoryResult<Integration> {
    let IntegrationRow {
        id,
        project_id,
        kind: persisted_kind,
        external_id: persisted_external_id,
        config,
        enabled,
        created_at,
    } = row;

    let kind = Source::new(persisted_kind).map_err(IntegrationRepositoryError::persistence)?;
    let external_id = ExternalRepoId::new(persisted_external_id)
        .map_err(IntegrationRepositoryError::persistence)?;

    Ok(Integration::from_persisted(PersistedIntegrationData {
        id: IntegrationId::from_uuid(id),
        project_id: ProjectId::from_uuid(project_id),
        kind,
        external_id,
        config,
        enabled,
        created_at,
    }))
}
