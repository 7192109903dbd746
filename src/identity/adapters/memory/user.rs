//! In-memory user repository for tests and reference behaviour.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{User, UserId, Username},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
///
/// Enforces the same uniqueness rules as the relational schema: username
/// and email are unique across all rows.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<UserId, User>,
    username_index: HashMap<String, UserId>,
    email_index: HashMap<String, UserId>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Rejects username/email values already indexed for a different user.
fn check_uniqueness(state: &InMemoryUserState, user: &User) -> UserRepositoryResult<()> {
    let username_key = user.username().as_str();
    if let Some(holder) = state.username_index.get(username_key)
        && *holder != user.id()
    {
        return Err(UserRepositoryError::DuplicateUsername(
            username_key.to_owned(),
        ));
    }

    let email_key = user.email().as_str();
    if let Some(holder) = state.email_index.get(email_key)
        && *holder != user.id()
    {
        return Err(UserRepositoryError::DuplicateEmail(email_key.to_owned()));
    }

    Ok(())
}

fn index_user(state: &mut InMemoryUserState, user: &User) {
    state
        .username_index
        .insert(user.username().as_str().to_owned(), user.id());
    state
        .email_index
        .insert(user.email().as_str().to_owned(), user.id());
}

fn unindex_user(state: &mut InMemoryUserState, user: &User) {
    state.username_index.remove(user.username().as_str());
    state.email_index.remove(user.email().as_str());
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.users.contains_key(&user.id()) {
            return Err(UserRepositoryError::DuplicateUser(user.id()));
        }
        check_uniqueness(&state, user)?;

        index_user(&mut state, user);
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let old_user = state
            .users
            .get(&user.id())
            .ok_or(UserRepositoryError::NotFound(user.id()))?
            .clone();
        check_uniqueness(&state, user)?;

        unindex_user(&mut state, &old_user);
        index_user(&mut state, user);
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(|err| {
            UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(|err| {
            UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let user = state
            .username_index
            .get(username.as_str())
            .and_then(|user_id| state.users.get(user_id))
            .cloned();
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let user = state
            .users
            .remove(&id)
            .ok_or(UserRepositoryError::NotFound(id))?;
        unindex_user(&mut state, &user);
        Ok(())
    }
}
