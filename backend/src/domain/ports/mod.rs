//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::port_error;

mod authenticator;
mod health_checker;
mod user_repository;

#[cfg(test)]
pub use authenticator::MockAuthenticator;
pub use authenticator::{Authenticator, AuthenticatorError};
#[cfg(test)]
pub use health_checker::{
    MockHealthChecker, MockHealthProbe, MockMemorySampler, MockUptimeSource,
};
pub use health_checker::{
    HealthChecker, HealthProbe, MemorySample, MemorySampler, ProbeError, ProbeReport,
    UptimeSource,
};
#[cfg(test)]
pub use user_repository::{MockUserCommandRepository, MockUserQueryRepository};
pub use user_repository::{UserCommandRepository, UserPersistenceError, UserQueryRepository};
