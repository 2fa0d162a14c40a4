//! Get-user use case.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::UserQueryRepository;
use crate::domain::{Error, User, UserId};

use super::map_persistence_error;

/// Driving port for user lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GetUser: Send + Sync {
    /// Fetch a user by raw identifier.
    ///
    /// The identifier is validated before the repository is consulted.
    async fn execute(&self, user_id: &str) -> Result<User, Error>;
}

/// Service implementing [`GetUser`] over the query repository.
#[derive(Clone)]
pub struct GetUserService<Q> {
    query_repo: Arc<Q>,
}

impl<Q> GetUserService<Q> {
    /// Create a new service with the given repository.
    pub fn new(query_repo: Arc<Q>) -> Self {
        Self { query_repo }
    }
}

#[async_trait]
impl<Q> GetUser for GetUserService<Q>
where
    Q: UserQueryRepository,
{
    async fn execute(&self, user_id: &str) -> Result<User, Error> {
        let id = UserId::new(user_id)?;
        self.query_repo
            .find_by_id(&id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("User with ID {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockUserQueryRepository, UserPersistenceError};
    use rstest::rstest;

    fn make_service(repo: MockUserQueryRepository) -> GetUserService<MockUserQueryRepository> {
        GetUserService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn returns_stored_user() {
        let user = User::try_new(UserId::new("u-1").expect("id"), "a@b.com", "A").expect("user");
        let expected = user.clone();
        let mut repo = MockUserQueryRepository::new();
        repo.expect_find_by_id()
            .withf(|id| id.as_ref() == "u-1")
            .times(1)
            .return_once(move |_| Ok(Some(user)));

        let fetched = make_service(repo).execute(" u-1 ").await.expect("found");
        assert_eq!(fetched, expected);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let mut repo = MockUserQueryRepository::new();
        repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let error = make_service(repo).execute("ghost").await.expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "User with ID ghost not found");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn blank_id_fails_before_repository_call(#[case] raw: &str) {
        let mut repo = MockUserQueryRepository::new();
        repo.expect_find_by_id().never();

        let error = make_service(repo).execute(raw).await.expect_err("blank id");
        assert_eq!(error.code(), ErrorCode::Validation);
    }

    #[tokio::test]
    async fn repository_failure_is_internal() {
        let mut repo = MockUserQueryRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .return_once(|_| Err(UserPersistenceError::query("timeout")));

        let error = make_service(repo).execute("u-1").await.expect_err("failure");
        assert_eq!(error.code(), ErrorCode::Internal);
    }
}
