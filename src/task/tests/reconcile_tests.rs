//! Reconciliation state-machine tests: create-or-update, status changes,
//! deletions, and the lookup-then-insert race.

use std::sync::Arc;

use crate::project::domain::ProjectId;
use crate::task::{
    adapters::memory::{InMemoryIntegrationRegistry, InMemoryTaskStore},
    domain::{
        EventKind, ExternalRepoId, ExternalTaskRef, Integration, Source, Task, TaskDomainError,
        TaskStatus, TaskTitle,
    },
    ports::{
        EventRepository, IntegrationRepository, TaskRepository, TaskRepositoryError,
        events::MockEventRepository, repository::MockTaskRepository,
    },
    services::{ExternalStatusChange, ExternalTaskChange, ReconcileError, ReconcileService},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::json;

type TestReconciler = ReconcileService<
    InMemoryTaskStore,
    InMemoryIntegrationRegistry,
    InMemoryTaskStore,
    DefaultClock,
>;

struct Harness {
    reconciler: TestReconciler,
    store: Arc<InMemoryTaskStore>,
    integrations: Arc<InMemoryIntegrationRegistry>,
    project_id: ProjectId,
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemoryTaskStore::new());
    let integrations = Arc::new(InMemoryIntegrationRegistry::new());
    let reconciler = ReconcileService::new(
        Arc::clone(&store),
        Arc::clone(&integrations),
        Arc::clone(&store),
        Arc::new(DefaultClock),
    );
    Harness {
        reconciler,
        store,
        integrations,
        project_id: ProjectId::new(),
    }
}

async fn bind_integration(harness: &Harness, kind: &str, repository: &str, enabled: bool) {
    let integration = Integration::new(
        harness.project_id,
        Source::new(kind).expect("valid source"),
        ExternalRepoId::new(repository).expect("valid repository"),
        json!({}),
        enabled,
        &DefaultClock,
    );
    harness
        .integrations
        .store(&integration)
        .await
        .expect("integration storage should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upsert_creates_task_under_the_integration_project(harness: Harness) {
    bind_integration(&harness, "github", "acme/repo", true).await;

    let change = ExternalTaskChange::new("github", "acme/repo", "42", "Fix bug")
        .with_description("Crash on empty input");
    let task = harness
        .reconciler
        .upsert_from_external(change)
        .await
        .expect("upsert should succeed");

    assert_eq!(task.project_id(), harness.project_id);
    assert_eq!(task.status(), TaskStatus::Todo);
    assert_eq!(task.created_by(), None);
    assert_eq!(task.title().as_str(), "Fix bug");
    assert_eq!(task.description(), Some("Crash on empty input"));

    let events = harness
        .store
        .list_for_task(task.id())
        .await
        .expect("event listing should succeed");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), EventKind::ExternalCreated);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upsert_for_a_mapped_reference_updates_in_place(harness: Harness) {
    bind_integration(&harness, "github", "acme/repo", true).await;

    let created = harness
        .reconciler
        .upsert_from_external(ExternalTaskChange::new("github", "acme/repo", "42", "Fix bug"))
        .await
        .expect("first upsert should succeed");

    let updated = harness
        .reconciler
        .upsert_from_external(ExternalTaskChange::new(
            "github",
            "acme/repo",
            "42",
            "Fix bug v2",
        ))
        .await
        .expect("second upsert should succeed");

    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.title().as_str(), "Fix bug v2");
    assert_eq!(updated.status(), TaskStatus::Todo);

    let events = harness
        .store
        .list_for_task(created.id())
        .await
        .expect("event listing should succeed");
    let kinds: Vec<_> = events.iter().map(|event| event.kind()).collect();
    assert_eq!(
        kinds,
        vec![EventKind::ExternalCreated, EventKind::ExternalUpdated]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn source_matching_is_case_insensitive(harness: Harness) {
    bind_integration(&harness, "github", "acme/repo", true).await;

    let task = harness
        .reconciler
        .upsert_from_external(ExternalTaskChange::new("GitHub", "acme/repo", "42", "Fix bug"))
        .await
        .expect("upsert should succeed");

    assert_eq!(task.project_id(), harness.project_id);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upsert_without_any_integration_fails(harness: Harness) {
    let result = harness
        .reconciler
        .upsert_from_external(ExternalTaskChange::new("github", "acme/repo", "42", "Fix bug"))
        .await;

    assert!(matches!(
        result,
        Err(ReconcileError::IntegrationNotFound { source, repository })
            if source.as_str() == "github" && repository.as_str() == "acme/repo"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disabled_integration_counts_as_absent(harness: Harness) {
    bind_integration(&harness, "github", "acme/repo", false).await;

    let result = harness
        .reconciler
        .upsert_from_external(ExternalTaskChange::new("github", "acme/repo", "42", "Fix bug"))
        .await;

    assert!(matches!(
        result,
        Err(ReconcileError::IntegrationNotFound { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upsert_rejects_an_overlong_title(harness: Harness) {
    bind_integration(&harness, "github", "acme/repo", true).await;

    let title = "a".repeat(201);
    let result = harness
        .reconciler
        .upsert_from_external(ExternalTaskChange::new("github", "acme/repo", "42", title))
        .await;

    assert!(matches!(
        result,
        Err(ReconcileError::Domain(TaskDomainError::InvalidTitle(_)))
    ));

    let external_ref = ExternalTaskRef::from_parts("github", "42").expect("valid reference");
    let stored = harness
        .store
        .find_by_external_ref(&external_ref)
        .await
        .expect("lookup should succeed");
    assert_eq!(stored, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upsert_rejects_an_overlong_description(harness: Harness) {
    bind_integration(&harness, "github", "acme/repo", true).await;

    let change = ExternalTaskChange::new("github", "acme/repo", "42", "Fix bug")
        .with_description("a".repeat(1001));
    let result = harness.reconciler.upsert_from_external(change).await;

    assert!(matches!(
        result,
        Err(ReconcileError::Domain(TaskDomainError::DescriptionTooLong))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_change_overwrites_status_only(harness: Harness) {
    bind_integration(&harness, "github", "acme/repo", true).await;
    let created = harness
        .reconciler
        .upsert_from_external(ExternalTaskChange::new("github", "acme/repo", "42", "Fix bug"))
        .await
        .expect("upsert should succeed");

    let updated = harness
        .reconciler
        .update_status_from_external(ExternalStatusChange::new(
            "github",
            "acme/repo",
            "42",
            "in_progress",
        ))
        .await
        .expect("status change should succeed");

    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.status(), TaskStatus::InProgress);
    assert_eq!(updated.title().as_str(), "Fix bug");

    let events = harness
        .store
        .list_for_task(created.id())
        .await
        .expect("event listing should succeed");
    let last = events.last().expect("an event should be recorded");
    assert_eq!(last.kind(), EventKind::ExternalStatusChanged);
    assert_eq!(last.payload(), &json!({ "status": "in_progress" }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_change_never_creates_a_task(harness: Harness) {
    bind_integration(&harness, "github", "acme/repo", true).await;

    let result = harness
        .reconciler
        .update_status_from_external(ExternalStatusChange::new(
            "github",
            "acme/repo",
            "42",
            "completed",
        ))
        .await;

    assert!(matches!(
        result,
        Err(ReconcileError::TaskNotFound(external_ref))
            if external_ref.to_string() == "github:42"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_change_rejects_unknown_status_values(harness: Harness) {
    bind_integration(&harness, "github", "acme/repo", true).await;

    let result = harness
        .reconciler
        .update_status_from_external(ExternalStatusChange::new("github", "acme/repo", "42", "done"))
        .await;

    assert!(matches!(
        result,
        Err(ReconcileError::UnknownStatus(status)) if status == "done"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_the_task_and_its_events(harness: Harness) {
    bind_integration(&harness, "github", "acme/repo", true).await;
    let created = harness
        .reconciler
        .upsert_from_external(ExternalTaskChange::new("github", "acme/repo", "42", "Fix bug"))
        .await
        .expect("upsert should succeed");

    harness
        .reconciler
        .delete_from_external("github", "acme/repo", "42")
        .await
        .expect("deletion should succeed");

    let external_ref = ExternalTaskRef::from_parts("github", "42").expect("valid reference");
    let remaining = harness
        .store
        .find_by_external_ref(&external_ref)
        .await
        .expect("lookup should succeed");
    assert_eq!(remaining, None);

    let events = harness
        .store
        .list_for_task(created.id())
        .await
        .expect("event listing should succeed");
    assert!(events.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_for_an_unmapped_reference_fails(harness: Harness) {
    bind_integration(&harness, "github", "acme/repo", true).await;

    let result = harness
        .reconciler
        .delete_from_external("github", "acme/repo", "42")
        .await;

    assert!(matches!(result, Err(ReconcileError::TaskNotFound(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn lost_creation_race_is_reapplied_as_an_update() {
    let project_id = ProjectId::new();
    let integrations = Arc::new(InMemoryIntegrationRegistry::new());
    let integration = Integration::new(
        project_id,
        Source::new("github").expect("valid source"),
        ExternalRepoId::new("acme/repo").expect("valid repository"),
        json!({}),
        true,
        &DefaultClock,
    );
    integrations
        .store(&integration)
        .await
        .expect("integration storage should succeed");

    let external_ref = ExternalTaskRef::from_parts("github", "42").expect("valid reference");
    let winner = Task::new_from_external(
        project_id,
        external_ref.clone(),
        TaskTitle::new("Fix bug").expect("valid title"),
        None,
        &DefaultClock,
    );

    let mut tasks = MockTaskRepository::new();
    let mut sequence = mockall::Sequence::new();
    tasks
        .expect_find_by_external_ref()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Ok(None));
    let conflict_ref = external_ref.clone();
    tasks
        .expect_store()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(move |_| {
            Err(TaskRepositoryError::DuplicateExternalRef(
                conflict_ref.clone(),
            ))
        });
    let raced = winner.clone();
    tasks
        .expect_find_by_external_ref()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(move |_| Ok(Some(raced.clone())));
    tasks.expect_update().times(1).returning(|_| Ok(()));

    let mut events = MockEventRepository::new();
    events
        .expect_append()
        .times(1)
        .withf(|event| event.kind() == EventKind::ExternalUpdated)
        .returning(|_| Ok(()));

    let reconciler = ReconcileService::new(
        Arc::new(tasks),
        integrations,
        Arc::new(events),
        Arc::new(DefaultClock),
    );

    let task = reconciler
        .upsert_from_external(ExternalTaskChange::new(
            "github",
            "acme/repo",
            "42",
            "Fix bug v2",
        ))
        .await
        .expect("conflicting upsert should resolve as an update");

    assert_eq!(task.id(), winner.id());
    assert_eq!(task.title().as_str(), "Fix bug v2");
    assert_eq!(task.status(), TaskStatus::Todo);
}
