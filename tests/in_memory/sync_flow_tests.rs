//! End-to-end reconciliation tests: external events flowing through
//! integration resolution into the task store and audit log.

use crate::in_memory::helpers::{Backend, backend};
use rstest::rstest;
use serde_json::json;
use taskforge::identity::services::SignupRequest;
use taskforge::project::domain::ProjectId;
use taskforge::project::services::CreateProjectRequest;
use taskforge::task::domain::{Event, EventKind, TaskStatus};
use taskforge::task::ports::EventRepository;
use taskforge::task::services::{
    ExternalStatusChange, ExternalTaskChange, ReconcileError, RegisterIntegrationRequest,
    UpdateIntegrationRequest,
};

async fn provision_project(backend: &Backend) -> Result<ProjectId, eyre::Report> {
    let user = backend
        .accounts
        .signup(SignupRequest::new("alice", "alice@example.com"))
        .await?;
    let project = backend
        .projects
        .create(CreateProjectRequest::new("Road map", user.id()))
        .await?;
    Ok(project.id())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn external_events_drive_the_task_lifecycle(backend: Backend) -> Result<(), eyre::Report> {
    let project_id = provision_project(&backend).await?;
    backend
        .integrations
        .register(RegisterIntegrationRequest::new(
            project_id,
            "github",
            "acme/repo",
        ))
        .await?;

    let created = backend
        .reconciler
        .upsert_from_external(ExternalTaskChange::new("github", "acme/repo", "42", "Fix bug"))
        .await?;
    eyre::ensure!(created.project_id() == project_id, "wrong target project");
    eyre::ensure!(created.status() == TaskStatus::Todo, "new task should be todo");

    let renamed = backend
        .reconciler
        .upsert_from_external(ExternalTaskChange::new(
            "github",
            "acme/repo",
            "42",
            "Fix bug v2",
        ))
        .await?;
    eyre::ensure!(renamed.id() == created.id(), "rename should reuse the row");
    eyre::ensure!(renamed.title().as_str() == "Fix bug v2", "title not updated");
    eyre::ensure!(renamed.status() == TaskStatus::Todo, "status should be untouched");

    let completed = backend
        .reconciler
        .update_status_from_external(ExternalStatusChange::new(
            "github",
            "acme/repo",
            "42",
            "completed",
        ))
        .await?;
    eyre::ensure!(completed.status() == TaskStatus::Completed, "status not applied");

    let events = backend.store.list_for_task(created.id()).await?;
    let kinds: Vec<_> = events.iter().map(Event::kind).collect();
    eyre::ensure!(
        kinds
            == vec![
                EventKind::ExternalCreated,
                EventKind::ExternalUpdated,
                EventKind::ExternalStatusChanged,
            ],
        "unexpected audit trail: {kinds:?}"
    );
    let last = events
        .last()
        .ok_or_else(|| eyre::eyre!("expected a recorded event"))?;
    eyre::ensure!(
        last.payload() == &json!({ "status": "completed" }),
        "unexpected status payload"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disabled_integration_rejects_incoming_events(
    backend: Backend,
) -> Result<(), eyre::Report> {
    let project_id = provision_project(&backend).await?;
    let integration = backend
        .integrations
        .register(RegisterIntegrationRequest::new(
            project_id,
            "github",
            "acme/repo",
        ))
        .await?;

    backend
        .integrations
        .update(
            integration.id(),
            UpdateIntegrationRequest::new().with_enabled(false),
        )
        .await?;

    let result = backend
        .reconciler
        .upsert_from_external(ExternalTaskChange::new("github", "acme/repo", "42", "Fix bug"))
        .await;
    eyre::ensure!(
        matches!(result, Err(ReconcileError::IntegrationNotFound { .. })),
        "disabled integration should not match"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn identical_ids_from_different_sources_map_to_distinct_tasks(
    backend: Backend,
) -> Result<(), eyre::Report> {
    let project_id = provision_project(&backend).await?;
    backend
        .integrations
        .register(RegisterIntegrationRequest::new(
            project_id,
            "github",
            "acme/repo",
        ))
        .await?;
    backend
        .integrations
        .register(RegisterIntegrationRequest::new(
            project_id,
            "gitlab",
            "acme/repo",
        ))
        .await?;

    let from_github = backend
        .reconciler
        .upsert_from_external(ExternalTaskChange::new("github", "acme/repo", "42", "Fix bug"))
        .await?;
    let from_gitlab = backend
        .reconciler
        .upsert_from_external(ExternalTaskChange::new("gitlab", "acme/repo", "42", "Fix bug"))
        .await?;

    eyre::ensure!(
        from_github.id() != from_gitlab.id(),
        "sources should map to distinct tasks"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deletion_cascades_to_the_audit_log(backend: Backend) -> Result<(), eyre::Report> {
    let project_id = provision_project(&backend).await?;
    backend
        .integrations
        .register(RegisterIntegrationRequest::new(
            project_id,
            "github",
            "acme/repo",
        ))
        .await?;
    let created = backend
        .reconciler
        .upsert_from_external(ExternalTaskChange::new("github", "acme/repo", "42", "Fix bug"))
        .await?;

    backend
        .reconciler
        .delete_from_external("github", "acme/repo", "42")
        .await?;

    let events = backend.store.list_for_task(created.id()).await?;
    eyre::ensure!(events.is_empty(), "audit events should cascade");

    let repeat = backend
        .reconciler
        .delete_from_external("github", "acme/repo", "42")
        .await;
    eyre::ensure!(
        matches!(repeat, Err(ReconcileError::TaskNotFound(_))),
        "repeat deletion should report a missing task"
    );
    Ok(())
}
