//! Account lifecycle tests: signup, login, credential resolution, and the
//! restricted deletion policies across services.

use crate::in_memory::helpers::{Backend, backend};
use rstest::rstest;
use taskforge::identity::services::{AccountError, SignupRequest};
use taskforge::project::services::{CreateProjectRequest, ProjectServiceError};
use taskforge::task::services::{ExternalTaskChange, RegisterIntegrationRequest};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn signup_login_and_resolve_credential(backend: Backend) -> Result<(), eyre::Report> {
    let user = backend
        .accounts
        .signup(SignupRequest::new("alice", "alice@example.com"))
        .await?;
    let token = backend.accounts.login("alice").await?;

    let resolved = backend
        .accounts
        .authenticate(&format!("Bearer {token}"))
        .await?;
    eyre::ensure!(resolved == user, "credential resolved to a different user");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn user_deletion_is_blocked_by_owned_projects(backend: Backend) -> Result<(), eyre::Report> {
    let user = backend
        .accounts
        .signup(SignupRequest::new("alice", "alice@example.com"))
        .await?;
    let project = backend
        .projects
        .create(CreateProjectRequest::new("Road map", user.id()))
        .await?;

    let blocked = backend.accounts.delete(user.id()).await;
    eyre::ensure!(
        matches!(blocked, Err(AccountError::OwnsProjects(_))),
        "deletion should be blocked while projects remain"
    );

    backend.projects.delete(project.id()).await?;
    backend.accounts.delete(user.id()).await?;

    let gone = backend.accounts.get(user.id()).await;
    eyre::ensure!(
        matches!(gone, Err(AccountError::NotFound(_))),
        "account should be gone after deletion"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_token_is_rejected_after_account_deletion(
    backend: Backend,
) -> Result<(), eyre::Report> {
    let user = backend
        .accounts
        .signup(SignupRequest::new("alice", "alice@example.com"))
        .await?;
    let token = backend.accounts.login("alice").await?;
    backend.accounts.delete(user.id()).await?;

    let result = backend.accounts.authenticate(&token).await;
    eyre::ensure!(
        matches!(result, Err(AccountError::UnknownSubject(_))),
        "stale token should not resolve"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_deletion_is_blocked_by_synced_tasks(
    backend: Backend,
) -> Result<(), eyre::Report> {
    let user = backend
        .accounts
        .signup(SignupRequest::new("alice", "alice@example.com"))
        .await?;
    let project = backend
        .projects
        .create(CreateProjectRequest::new("Road map", user.id()))
        .await?;
    backend
        .integrations
        .register(RegisterIntegrationRequest::new(
            project.id(),
            "github",
            "acme/repo",
        ))
        .await?;
    backend
        .reconciler
        .upsert_from_external(ExternalTaskChange::new("github", "acme/repo", "42", "Fix bug"))
        .await?;

    let blocked = backend.projects.delete(project.id()).await;
    eyre::ensure!(
        matches!(blocked, Err(ProjectServiceError::HasTasks(_))),
        "deletion should be blocked while tasks remain"
    );

    backend
        .reconciler
        .delete_from_external("github", "acme/repo", "42")
        .await?;
    backend.projects.delete(project.id()).await?;
    Ok(())
}
