//! Service layer for signup, login, and account maintenance.

use crate::auth::{CredentialError, TokenService};
use crate::identity::{
    domain::{EmailAddress, IdentityDomainError, User, UserId, Username},
    ports::{UserRepository, UserRepositoryError},
};
use crate::project::ports::{ProjectRepository, ProjectRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    username: String,
    email: String,
}

impl SignupRequest {
    /// Creates a signup request from raw input values.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }
}

/// Partial update for an account.
///
/// Absent fields are left untouched; provided values are validated, so an
/// empty string is rejected rather than silently treated as "no change".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserRequest {
    username: Option<String>,
    email: Option<String>,
}

impl UpdateUserRequest {
    /// Creates an empty update request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a username change.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Requests an email change.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),

    /// The presented credential was rejected.
    #[error("credential rejected: {0}")]
    Credential(#[from] CredentialError),

    /// Login was attempted with an unknown username.
    #[error("unknown login username: {0}")]
    UnknownLogin(String),

    /// The credential verified but its subject no longer exists.
    #[error("credential subject no longer exists: {0}")]
    UnknownSubject(UserId),

    /// The requested username is already taken.
    #[error("username already taken: {0}")]
    UsernameTaken(String),

    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// The user still owns projects and cannot be deleted.
    #[error("user {0} still owns projects")]
    OwnsProjects(UserId),

    /// User repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),

    /// Project ownership lookup failed.
    #[error("project lookup failed: {0}")]
    Projects(#[from] ProjectRepositoryError),
}

/// Result type for account service operations.
pub type AccountResult<T> = Result<T, AccountError>;

/// Account orchestration service.
#[derive(Clone)]
pub struct AccountService<R, P, C>
where
    R: UserRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    users: Arc<R>,
    projects: Arc<P>,
    tokens: Arc<TokenService>,
    clock: Arc<C>,
}

impl<R, P, C> AccountService<R, P, C>
where
    R: UserRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new account service.
    #[must_use]
    pub const fn new(
        users: Arc<R>,
        projects: Arc<P>,
        tokens: Arc<TokenService>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            users,
            projects,
            tokens,
            clock,
        }
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UsernameTaken`] when the username is held by
    /// an existing account, [`AccountError::Domain`] when validation fails,
    /// or a repository error. The repository's uniqueness constraints back
    /// the pre-check, so a concurrent signup surfaces as a duplicate
    /// variant rather than a generic failure.
    pub async fn signup(&self, request: SignupRequest) -> AccountResult<User> {
        let username = Username::new(request.username)?;
        let email = EmailAddress::new(request.email)?;

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AccountError::UsernameTaken(username.as_str().to_owned()));
        }

        let user = User::new(username, email, &*self.clock);
        self.users.store(&user).await?;
        Ok(user)
    }

    /// Resolves a username and issues a bearer token for the account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UnknownLogin`] when no account holds the
    /// username, or [`AccountError::Credential`] when token issuance fails.
    pub async fn login(&self, username: &str) -> AccountResult<String> {
        let username = Username::new(username)?;
        let user = self
            .users
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AccountError::UnknownLogin(username.as_str().to_owned()))?;

        let token = self.tokens.issue_default_token(user.id(), &*self.clock)?;
        Ok(token)
    }

    /// Verifies a raw credential and resolves the subject to a live account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Credential`] when the token is invalid or
    /// expired, and [`AccountError::UnknownSubject`] when the token
    /// verifies but the account has since been deleted.
    pub async fn authenticate(&self, raw_credential: &str) -> AccountResult<User> {
        let subject = self.tokens.authenticate(raw_credential)?;
        self.users
            .find_by_id(subject)
            .await?
            .ok_or(AccountError::UnknownSubject(subject))
    }

    /// Retrieves an account by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotFound`] when the account does not exist.
    pub async fn get(&self, id: UserId) -> AccountResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))
    }

    /// Applies a partial update to an account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotFound`] when the account does not exist,
    /// [`AccountError::Domain`] when a provided value fails validation, or
    /// a duplicate repository error when the new username or email is
    /// taken.
    pub async fn update(&self, id: UserId, request: UpdateUserRequest) -> AccountResult<User> {
        let mut user = self.get(id).await?;

        if let Some(username) = request.username {
            user.set_username(Username::new(username)?);
        }
        if let Some(email) = request.email {
            user.set_email(EmailAddress::new(email)?);
        }

        self.users.update(&user).await?;
        Ok(user)
    }

    /// Deletes an account.
    ///
    /// Deletion is restricted: accounts that still own projects cannot be
    /// removed, so project ownership never dangles.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotFound`] when the account does not exist
    /// and [`AccountError::OwnsProjects`] when it still owns projects.
    pub async fn delete(&self, id: UserId) -> AccountResult<()> {
        if self.users.find_by_id(id).await?.is_none() {
            return Err(AccountError::NotFound(id));
        }

        let owned = self.projects.find_by_owner(id).await?;
        if !owned.is_empty() {
            return Err(AccountError::OwnsProjects(id));
        }

        self.users.delete(id).await?;
        Ok(())
    }
}
