//! Credential verification adapters.

mod static_authenticator;

pub use static_authenticator::StaticAuthenticator;
