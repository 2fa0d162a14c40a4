//! Neutral middleware shared by every route.
//!
//! - [`RequestTrace`] assigns a trace identifier and logs each request.
//! - [`BasicAuth`] guards routes with HTTP Basic credentials.

mod auth;
mod trace;

pub use auth::{
    AUTHENTICATION_FAILED, BasicAuth, INVALID_CREDENTIALS, INVALID_CREDENTIALS_FORMAT,
    MISSING_AUTHORIZATION,
};
pub use trace::RequestTrace;
