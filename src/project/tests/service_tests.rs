//! Project orchestration tests covering creation, partial updates, and the
//! restricted deletion policy.

use std::sync::Arc;

use crate::identity::domain::UserId;
use crate::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{ProjectDomainError, ProjectId},
    services::{CreateProjectRequest, ProjectService, ProjectServiceError, UpdateProjectRequest},
};
use crate::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{ExternalTaskRef, Task, TaskTitle},
    ports::TaskRepository,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = ProjectService<InMemoryProjectRepository, InMemoryTaskStore, DefaultClock>;

struct Harness {
    service: TestService,
    tasks: Arc<InMemoryTaskStore>,
}

#[fixture]
fn harness() -> Harness {
    let tasks = Arc::new(InMemoryTaskStore::new());
    let service = ProjectService::new(
        Arc::new(InMemoryProjectRepository::new()),
        Arc::clone(&tasks),
        Arc::new(DefaultClock),
    );
    Harness { service, tasks }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_persists_and_is_retrievable(harness: Harness) {
    let owner = UserId::new();
    let created = harness
        .service
        .create(CreateProjectRequest::new("Road map", owner).with_description("Q3 work"))
        .await
        .expect("project creation should succeed");

    let fetched = harness
        .service
        .get(created.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched, created);
    assert_eq!(fetched.owner(), owner);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_can_clear_the_description(harness: Harness) {
    let created = harness
        .service
        .create(CreateProjectRequest::new("Road map", UserId::new()).with_description("Q3 work"))
        .await
        .expect("project creation should succeed");

    let updated = harness
        .service
        .update(
            created.id(),
            UpdateProjectRequest::new().clearing_description(),
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.description(), None);
    assert_eq!(updated.name(), created.name());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_rejects_an_overlong_description(harness: Harness) {
    let created = harness
        .service
        .create(CreateProjectRequest::new("Road map", UserId::new()).with_description("Q3 work"))
        .await
        .expect("project creation should succeed");

    let result = harness
        .service
        .update(
            created.id(),
            UpdateProjectRequest::new().with_description("a".repeat(501)),
        )
        .await;
    assert!(matches!(
        result,
        Err(ProjectServiceError::Domain(
            ProjectDomainError::DescriptionTooLong
        ))
    ));

    let fetched = harness
        .service
        .get(created.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched.description(), Some("Q3 work"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_without_fields_changes_nothing(harness: Harness) {
    let created = harness
        .service
        .create(CreateProjectRequest::new("Road map", UserId::new()).with_description("Q3 work"))
        .await
        .expect("project creation should succeed");

    let updated = harness
        .service
        .update(created.id(), UpdateProjectRequest::new())
        .await
        .expect("update should succeed");

    assert_eq!(updated, created);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_unknown_project_fails(harness: Harness) {
    let missing = ProjectId::new();
    let result = harness.service.get(missing).await;
    assert!(matches!(
        result,
        Err(ProjectServiceError::NotFound(id)) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_is_restricted_while_tasks_remain(harness: Harness) {
    let created = harness
        .service
        .create(CreateProjectRequest::new("Road map", UserId::new()))
        .await
        .expect("project creation should succeed");

    let title = TaskTitle::new("Fix bug").expect("valid title");
    let external_ref = ExternalTaskRef::from_parts("github", "42").expect("valid reference");
    let task = Task::new_from_external(created.id(), external_ref, title, None, &DefaultClock);
    harness
        .tasks
        .store(&task)
        .await
        .expect("task storage should succeed");

    let result = harness.service.delete(created.id()).await;
    assert!(matches!(
        result,
        Err(ProjectServiceError::HasTasks(id)) if id == created.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_succeeds_once_tasks_are_gone(harness: Harness) {
    let created = harness
        .service
        .create(CreateProjectRequest::new("Road map", UserId::new()))
        .await
        .expect("project creation should succeed");

    harness
        .service
        .delete(created.id())
        .await
        .expect("deletion should succeed");

    let result = harness.service.get(created.id()).await;
    assert!(matches!(result, Err(ProjectServiceError::NotFound(_))));
}
