//! Shared test helpers wiring the full in-memory backend.

use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use taskforge::auth::TokenService;
use taskforge::identity::{
    adapters::memory::InMemoryUserRepository, services::AccountService,
};
use taskforge::project::{
    adapters::memory::InMemoryProjectRepository, services::ProjectService,
};
use taskforge::task::{
    adapters::memory::{InMemoryIntegrationRegistry, InMemoryTaskStore},
    services::{IntegrationService, ReconcileService},
};

/// Account service over the in-memory adapters.
pub type Accounts =
    AccountService<InMemoryUserRepository, InMemoryProjectRepository, DefaultClock>;
/// Project service over the in-memory adapters.
pub type Projects = ProjectService<InMemoryProjectRepository, InMemoryTaskStore, DefaultClock>;
/// Integration service over the in-memory registry.
pub type Integrations = IntegrationService<InMemoryIntegrationRegistry, DefaultClock>;
/// Reconciler over the in-memory adapters.
pub type Reconciler = ReconcileService<
    InMemoryTaskStore,
    InMemoryIntegrationRegistry,
    InMemoryTaskStore,
    DefaultClock,
>;

/// Fully wired in-memory backend sharing one set of adapters, so the
/// services observe each other's writes exactly as they would against a
/// shared database.
pub struct Backend {
    /// Account orchestration service.
    pub accounts: Accounts,
    /// Project orchestration service.
    pub projects: Projects,
    /// Integration orchestration service.
    pub integrations: Integrations,
    /// External-sync reconciliation service.
    pub reconciler: Reconciler,
    /// Shared task and event store, for direct verification.
    pub store: Arc<InMemoryTaskStore>,
}

/// Provides a fresh, fully wired backend for each test.
#[fixture]
pub fn backend() -> Backend {
    let users = Arc::new(InMemoryUserRepository::new());
    let project_repo = Arc::new(InMemoryProjectRepository::new());
    let store = Arc::new(InMemoryTaskStore::new());
    let registry = Arc::new(InMemoryIntegrationRegistry::new());
    let clock = Arc::new(DefaultClock);
    let tokens = Arc::new(TokenService::new("integration-test-secret"));

    Backend {
        accounts: AccountService::new(
            users,
            Arc::clone(&project_repo),
            tokens,
            Arc::clone(&clock),
        ),
        projects: ProjectService::new(project_repo, Arc::clone(&store), Arc::clone(&clock)),
        integrations: IntegrationService::new(Arc::clone(&registry), Arc::clone(&clock)),
        reconciler: ReconcileService::new(
            Arc::clone(&store),
            registry,
            Arc::clone(&store),
            clock,
        ),
        store,
    }
}
