//! Driven port for credential verification.
//!
//! The Basic auth middleware decodes the `Authorization` header into
//! [`Credentials`] and asks this port whether they are valid. Adapters may
//! check a static map, a database, or an identity provider.

use async_trait::async_trait;

use crate::domain::Credentials;

use super::port_error;

port_error! {
    /// Failures raised while verifying credentials.
    pub enum AuthenticatorError {
        /// The credential store could not be consulted.
        Unavailable { message: String } => "authenticator unavailable: {message}",
    }
}

/// Port for verifying caller credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Return `Ok(true)` when the credentials are accepted and `Ok(false)`
    /// when they are rejected.
    async fn authenticate(&self, credentials: &Credentials) -> Result<bool, AuthenticatorError>;
}
