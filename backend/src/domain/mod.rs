//! Domain primitives, aggregates, and ports.
//!
//! Purpose: Define strongly typed domain entities used by the use cases and
//! adapters. Keep types immutable and document invariants and serialisation
//! contracts (serde) in each type's Rustdoc. Nothing here knows about HTTP.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User / UserId: validated user identity.
//! - Credentials: caller-supplied username and password.
//! - HealthStatus / HealthCheck / SystemHealth: health report model.
//! - TraceId: request-scoped correlation identifier.

pub mod auth;
pub mod error;
pub mod health;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{Credentials, CredentialsValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::health::{
    HealthCheck, HealthCheckValidationError, HealthStatus, SystemHealth, UNNAMED_CHECK,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserId, UserValidationError};

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use sprint_zero::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::not_found("nothing here"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
