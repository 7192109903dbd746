//! Account orchestration tests covering signup, login, credential
//! resolution, and the restricted deletion policy.

use std::sync::Arc;

use crate::auth::TokenService;
use crate::identity::{
    adapters::memory::InMemoryUserRepository,
    domain::UserId,
    services::{AccountError, AccountService, SignupRequest, UpdateUserRequest},
};
use crate::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{Project, ProjectName},
    ports::ProjectRepository,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = AccountService<InMemoryUserRepository, InMemoryProjectRepository, DefaultClock>;

struct Harness {
    service: TestService,
    projects: Arc<InMemoryProjectRepository>,
}

#[fixture]
fn harness() -> Harness {
    let projects = Arc::new(InMemoryProjectRepository::new());
    let service = AccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::clone(&projects),
        Arc::new(TokenService::new("service-test-secret")),
        Arc::new(DefaultClock),
    );
    Harness { service, projects }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn signup_login_authenticate_roundtrip(harness: Harness) {
    let user = harness
        .service
        .signup(SignupRequest::new("alice", "alice@example.com"))
        .await
        .expect("signup should succeed");

    let token = harness
        .service
        .login("alice")
        .await
        .expect("login should succeed");
    let resolved = harness
        .service
        .authenticate(&format!("Bearer {token}"))
        .await
        .expect("authentication should succeed");

    assert_eq!(resolved, user);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn signup_rejects_taken_username(harness: Harness) {
    harness
        .service
        .signup(SignupRequest::new("alice", "alice@example.com"))
        .await
        .expect("first signup should succeed");

    let result = harness
        .service
        .signup(SignupRequest::new("alice", "other@example.com"))
        .await;

    assert!(matches!(
        result,
        Err(AccountError::UsernameTaken(username)) if username == "alice"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn login_with_unknown_username_fails(harness: Harness) {
    let result = harness.service.login("nobody").await;
    assert!(matches!(
        result,
        Err(AccountError::UnknownLogin(username)) if username == "nobody"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn token_for_deleted_account_is_rejected(harness: Harness) {
    let user = harness
        .service
        .signup(SignupRequest::new("alice", "alice@example.com"))
        .await
        .expect("signup should succeed");
    let token = harness
        .service
        .login("alice")
        .await
        .expect("login should succeed");

    harness
        .service
        .delete(user.id())
        .await
        .expect("deletion should succeed");

    let result = harness.service.authenticate(&token).await;
    assert!(matches!(
        result,
        Err(AccountError::UnknownSubject(subject)) if subject == user.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_only_provided_fields(harness: Harness) {
    let user = harness
        .service
        .signup(SignupRequest::new("alice", "alice@example.com"))
        .await
        .expect("signup should succeed");

    let updated = harness
        .service
        .update(user.id(), UpdateUserRequest::new().with_username("alice2"))
        .await
        .expect("update should succeed");

    assert_eq!(updated.username().as_str(), "alice2");
    assert_eq!(updated.email().as_str(), "alice@example.com");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_unknown_user_fails(harness: Harness) {
    let missing = UserId::new();
    let result = harness.service.get(missing).await;
    assert!(matches!(
        result,
        Err(AccountError::NotFound(id)) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_is_restricted_while_projects_remain(harness: Harness) {
    let user = harness
        .service
        .signup(SignupRequest::new("alice", "alice@example.com"))
        .await
        .expect("signup should succeed");

    let name = ProjectName::new("Road map").expect("valid project name");
    let project = Project::new(name, user.id(), None, &DefaultClock);
    harness
        .projects
        .store(&project)
        .await
        .expect("project storage should succeed");

    let result = harness.service.delete(user.id()).await;
    assert!(matches!(
        result,
        Err(AccountError::OwnsProjects(id)) if id == user.id()
    ));
}
