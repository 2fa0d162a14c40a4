//! Application use cases.
//!
//! Each use case is a driving port (a trait the inbound adapters call) plus a
//! service implementing it on top of the domain's driven ports. Services hold
//! their dependencies behind `Arc` so one instance can be shared across
//! request workers.

mod create_user;
mod get_user;
mod health;

pub use create_user::{CreateUser, CreateUserRequest, CreateUserService};
#[cfg(test)]
pub use create_user::MockCreateUser;
pub use get_user::{GetUser, GetUserService};
#[cfg(test)]
pub use get_user::MockGetUser;
pub use health::{CheckHealth, HealthService};
#[cfg(test)]
pub use health::MockCheckHealth;

use crate::domain::Error;
use crate::domain::ports::UserPersistenceError;

/// Translate repository failures into domain errors.
///
/// Uniqueness and existence failures keep their category so callers can
/// react to them; anything else becomes an internal error.
pub(crate) fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateId { id } => {
            Error::conflict(format!("User with ID {id} already exists"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("User with email {email} already exists"))
        }
        UserPersistenceError::NotFound { id } => {
            Error::not_found(format!("User with ID {id} not found"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}
