//! Authenticator backed by a fixed username/password map.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::Credentials;
use crate::domain::ports::{Authenticator, AuthenticatorError};

/// Checks credentials against a map injected at construction time.
///
/// # Examples
/// ```
/// use sprint_zero::outbound::security::StaticAuthenticator;
///
/// let auth = StaticAuthenticator::new([("admin", "password")]);
/// assert_eq!(auth.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct StaticAuthenticator {
    users: HashMap<String, Zeroizing<String>>,
}

impl fmt::Debug for StaticAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticAuthenticator")
            .field("users", &self.users.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl StaticAuthenticator {
    /// Build from `(username, password)` pairs. Later pairs win on
    /// duplicate usernames.
    pub fn new<I, U, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        let users = pairs
            .into_iter()
            .map(|(user, password)| (user.into(), Zeroizing::new(password.into())))
            .collect();
        Self { users }
    }

    /// Number of known users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no users are configured.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<bool, AuthenticatorError> {
        Ok(self
            .users
            .get(credentials.username())
            .is_some_and(|stored| stored.as_str() == credentials.password()))
    }
}
