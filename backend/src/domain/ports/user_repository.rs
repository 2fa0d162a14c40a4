//! Ports for user persistence adapters and their errors.
//!
//! Reads and writes are split so use cases depend only on the side they
//! need: [`UserQueryRepository`] for lookups and [`UserCommandRepository`]
//! for mutations. A single adapter may implement both.
use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::port_error;

port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// A user with the same identifier is already stored.
        DuplicateId { id: String } => "user with id {id} already exists",
        /// A user with the same email is already stored.
        DuplicateEmail { email: String } => "user with email {email} already exists",
        /// No user is stored under the identifier.
        NotFound { id: String } => "user with id {id} not found",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Read side of user persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQueryRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by email, ignoring ASCII case.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;

    /// Whether a user is stored under the identifier.
    async fn exists(&self, id: &UserId) -> Result<bool, UserPersistenceError>;

    /// Every stored user, in no guaranteed order.
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError>;
}

/// Write side of user persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommandRepository: Send + Sync {
    /// Insert a new user.
    ///
    /// Fails with [`UserPersistenceError::DuplicateId`] or
    /// [`UserPersistenceError::DuplicateEmail`] when either key is taken.
    async fn create(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Replace an existing user.
    ///
    /// Fails with [`UserPersistenceError::NotFound`] when the user is absent.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Remove a user.
    ///
    /// Fails with [`UserPersistenceError::NotFound`] when the user is absent.
    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError>;
}
