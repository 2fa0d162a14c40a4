//! Authentication primitives such as credentials.
//!
//! Keep inbound header parsing outside the domain by exposing constructors
//! that validate string inputs before a middleware talks to the
//! authenticator port.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when credential values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username was empty.
    EmptyUsername,
    /// Password was empty.
    EmptyPassword,
    /// The `username:password` pair had no separator.
    MissingSeparator,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::MissingSeparator => write!(f, "credentials must be `username:password`"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated credentials presented by a caller.
///
/// ## Invariants
/// - `username` and `password` are both non-empty.
/// - Values are kept exactly as supplied; no trimming is applied so the
///   comparison performed by an authenticator is byte-for-byte.
///
/// # Examples
/// ```
/// use sprint_zero::domain::Credentials;
///
/// let creds = Credentials::from_pair("admin:pass:word").unwrap();
/// assert_eq!(creds.username(), "admin");
/// assert_eq!(creds.password(), "pass:word");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        if username.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }

        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Parse a `username:password` pair, splitting on the first colon.
    pub fn from_pair(pair: &str) -> Result<Self, CredentialsValidationError> {
        let (username, password) = pair
            .split_once(':')
            .ok_or(CredentialsValidationError::MissingSeparator)?;
        Self::try_from_parts(username, password)
    }

    /// Username supplied by the caller.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyUsername)]
    #[case("user", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_parts(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = Credentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("nocolon", CredentialsValidationError::MissingSeparator)]
    #[case(":secret", CredentialsValidationError::EmptyUsername)]
    #[case("admin:", CredentialsValidationError::EmptyPassword)]
    #[case("", CredentialsValidationError::MissingSeparator)]
    fn invalid_pairs(#[case] pair: &str, #[case] expected: CredentialsValidationError) {
        let err = Credentials::from_pair(pair).expect_err("invalid pair must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn debug_output_hides_password() {
        let creds = Credentials::from_pair("admin:hunter2").expect("valid pair");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }

    #[rstest]
    #[case("admin:password", "admin", "password")]
    #[case("user:se:cret", "user", "se:cret")]
    #[case(" spaced : pw ", " spaced ", " pw ")]
    fn valid_pairs(#[case] pair: &str, #[case] username: &str, #[case] password: &str) {
        let creds = Credentials::from_pair(pair).expect("valid pair");
        assert_eq!(creds.username(), username);
        assert_eq!(creds.password(), password);
    }
}
