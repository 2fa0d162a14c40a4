//! In-memory user repository.
//!
//! Stores users in a `HashMap` guarded by a `std::sync::RwLock`. Nothing is
//! persisted across restarts; the adapter stands in for a durable store
//! behind the same ports.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{UserCommandRepository, UserPersistenceError, UserQueryRepository};
use crate::domain::{User, UserId};

/// Repository implementing both user ports over a shared map.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> UserPersistenceError {
    UserPersistenceError::query("user store lock poisoned")
}

/// Stored emails are already lower-cased; fold the candidate the same way.
fn email_matches(user: &User, email: &str) -> bool {
    user.email() == email.trim().to_lowercase()
}

#[async_trait]
impl UserQueryRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.values().find(|user| email_matches(user, email)).cloned())
    }

    async fn exists(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.contains_key(id))
    }

    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.values().cloned().collect())
    }
}

#[async_trait]
impl UserCommandRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users.contains_key(user.id()) {
            return Err(UserPersistenceError::duplicate_id(user.id().as_ref()));
        }
        if users.values().any(|existing| email_matches(existing, user.email())) {
            return Err(UserPersistenceError::duplicate_email(user.email()));
        }
        users.insert(user.id().clone(), user.clone());
        debug!(user_id = %user.id(), "user stored");
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().map_err(poisoned)?;
        let slot = users
            .get_mut(user.id())
            .ok_or_else(|| UserPersistenceError::not_found(user.id().as_ref()))?;
        *slot = user.clone();
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().map_err(poisoned)?;
        users
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| UserPersistenceError::not_found(id.as_ref()))
    }
}
