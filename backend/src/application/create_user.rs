//! Create-user use case.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{UserCommandRepository, UserQueryRepository};
use crate::domain::{Error, User, UserId};

use super::map_persistence_error;

/// Input for [`CreateUser::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    /// Email address as supplied by the caller.
    pub email: String,
    /// Display name as supplied by the caller.
    pub name: String,
    /// Optional caller-chosen identifier. An absent or empty value means a
    /// fresh UUID v4 is generated.
    pub id: Option<String>,
}

/// Driving port for registering users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CreateUser: Send + Sync {
    /// Register a user and return its identifier.
    ///
    /// Checks run in a fixed order: identifier uniqueness, email uniqueness,
    /// field validation, then persistence.
    async fn execute(&self, request: CreateUserRequest) -> Result<UserId, Error>;
}

/// Service implementing [`CreateUser`] over the user repositories.
#[derive(Clone)]
pub struct CreateUserService<C, Q> {
    command_repo: Arc<C>,
    query_repo: Arc<Q>,
}

impl<C, Q> CreateUserService<C, Q> {
    /// Create a new service with the given repositories.
    pub fn new(command_repo: Arc<C>, query_repo: Arc<Q>) -> Self {
        Self {
            command_repo,
            query_repo,
        }
    }
}

fn resolve_id(raw: Option<&str>) -> Result<UserId, Error> {
    match raw {
        Some(value) if !value.is_empty() => Ok(UserId::new(value)?),
        _ => Ok(UserId::generate()),
    }
}

#[async_trait]
impl<C, Q> CreateUser for CreateUserService<C, Q>
where
    C: UserCommandRepository,
    Q: UserQueryRepository,
{
    async fn execute(&self, request: CreateUserRequest) -> Result<UserId, Error> {
        let user_id = resolve_id(request.id.as_deref())?;

        let existing = self
            .query_repo
            .find_by_id(&user_id)
            .await
            .map_err(map_persistence_error)?;
        if existing.is_some() {
            return Err(Error::conflict(format!(
                "User with ID {user_id} already exists"
            )));
        }

        let email = request.email.trim();
        let existing_by_email = self
            .query_repo
            .find_by_email(email)
            .await
            .map_err(map_persistence_error)?;
        if existing_by_email.is_some() {
            return Err(Error::conflict(format!(
                "User with email {email} already exists"
            )));
        }

        let user = User::try_new(user_id, &request.email, &request.name)?;
        self.command_repo
            .create(&user)
            .await
            .map_err(map_persistence_error)?;

        info!(user_id = %user.id(), "user created");
        Ok(user.id().clone())
    }
}
