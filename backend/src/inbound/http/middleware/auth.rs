//! HTTP Basic authentication middleware.
//!
//! Decodes `Authorization: Basic <base64(username:password)>` into
//! [`Credentials`] and asks the [`Authenticator`] port to verify them. On
//! success the username is attached to [`HttpRequest::auth_user`] and the
//! chain continues; otherwise the middleware answers directly.

use std::string::FromUtf8Error;
use std::sync::Arc;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::{debug, error, warn};
use zeroize::Zeroizing;

use crate::domain::ports::Authenticator;
use crate::domain::{Credentials, CredentialsValidationError, Error, ErrorCode};
use crate::inbound::http::adapter::{HttpRequest, HttpResponse, Middleware, Next};
use crate::inbound::http::error::{ErrorEnvelope, status_for, write_envelope};

/// Message for a missing or non-Basic `Authorization` header.
pub const MISSING_AUTHORIZATION: &str = "Missing or invalid authorization header";
/// Message for a header that does not decode to `username:password`.
pub const INVALID_CREDENTIALS_FORMAT: &str = "Invalid credentials format";
/// Message for credentials the authenticator rejected.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
/// Message for an authenticator failure.
pub const AUTHENTICATION_FAILED: &str = "Authentication failed";

const BASIC_PREFIX: &str = "Basic ";

#[derive(Debug, thiserror::Error)]
enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("credentials are not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error(transparent)]
    Credentials(#[from] CredentialsValidationError),
}

fn decode_credentials(encoded: &str) -> Result<Credentials, DecodeError> {
    let bytes = Zeroizing::new(STANDARD.decode(encoded.trim())?);
    let pair = Zeroizing::new(String::from_utf8(bytes.to_vec())?);
    Ok(Credentials::from_pair(&pair)?)
}

/// Guards a route with HTTP Basic authentication.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use sprint_zero::inbound::http::middleware::BasicAuth;
/// use sprint_zero::outbound::security::StaticAuthenticator;
///
/// let auth = BasicAuth::new(Arc::new(StaticAuthenticator::default()));
/// assert_eq!(auth.realm(), "api");
/// ```
#[derive(Clone)]
pub struct BasicAuth {
    authenticator: Arc<dyn Authenticator>,
    realm: String,
}

impl BasicAuth {
    /// Middleware verifying credentials with `authenticator`.
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            authenticator,
            realm: "api".to_owned(),
        }
    }

    /// Override the realm advertised in `WWW-Authenticate`.
    #[must_use]
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    /// Realm advertised in `WWW-Authenticate`.
    pub fn realm(&self) -> &str {
        self.realm.as_str()
    }

    fn challenge(&self, res: &mut HttpResponse, message: &str) {
        res.set_header("WWW-Authenticate", format!("Basic realm=\"{}\"", self.realm));
        write_envelope(
            res,
            status_for(ErrorCode::Unauthorized),
            &ErrorEnvelope::new(ErrorCode::Unauthorized, message),
        );
    }
}

#[async_trait]
impl Middleware for BasicAuth {
    async fn handle(
        &self,
        req: &mut HttpRequest,
        res: &mut HttpResponse,
        next: Next<'_>,
    ) -> Result<(), Error> {
        let Some(encoded) = req
            .header("authorization")
            .and_then(|value| value.strip_prefix(BASIC_PREFIX))
        else {
            debug!(path = %req.path, "missing Basic authorization header");
            self.challenge(res, MISSING_AUTHORIZATION);
            return Ok(());
        };

        let credentials = match decode_credentials(encoded) {
            Ok(credentials) => credentials,
            Err(err) => {
                debug!(path = %req.path, error = %err, "malformed Basic credentials");
                self.challenge(res, INVALID_CREDENTIALS_FORMAT);
                return Ok(());
            }
        };

        match self.authenticator.authenticate(&credentials).await {
            Ok(true) => {
                debug!(username = credentials.username(), "authenticated");
                req.auth_user = Some(credentials.username().to_owned());
                next.run(req, res).await
            }
            Ok(false) => {
                warn!(username = credentials.username(), path = %req.path, "rejected credentials");
                self.challenge(res, INVALID_CREDENTIALS);
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "authenticator failed");
                write_envelope(
                    res,
                    status_for(ErrorCode::Internal),
                    &ErrorEnvelope::new(ErrorCode::Internal, AUTHENTICATION_FAILED),
                );
                Ok(())
            }
        }
    }
}
