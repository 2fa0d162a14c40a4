//! User data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Error;

/// Validation errors returned by [`UserId::new`] and [`User::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidEmail,
    EmptyName,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "User ID cannot be empty"),
            Self::InvalidEmail => write!(f, "Invalid email address"),
            Self::EmptyName => write!(f, "Name cannot be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        Self::validation(value.to_string())
    }
}

/// Stable user identifier.
///
/// ## Invariants
/// - The identifier is trimmed and non-empty.
///
/// Identifiers compare by value. Generated identifiers are UUID v4 strings,
/// but callers may supply any non-blank value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`], trimming surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use sprint_zero::domain::UserId;
    ///
    /// let id = UserId::new("  42 ").expect("valid id");
    /// assert_eq!(id.as_ref(), "42");
    /// assert!(UserId::new("   ").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = id.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and contains `@`.
/// - `name` is trimmed and non-empty.
///
/// # Examples
/// ```
/// use sprint_zero::domain::{User, UserId};
///
/// let id = UserId::new("u-1").unwrap();
/// let user = User::try_new(id, " Ada@Example.COM ", " Ada ").unwrap();
/// assert_eq!(user.email(), "ada@example.com");
/// assert_eq!(user.name(), "Ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    email: String,
    name: String,
}

impl User {
    /// Validating factory for [`User`].
    ///
    /// The email is checked before the name, so an input with both problems
    /// reports the email.
    pub fn try_new(
        id: UserId,
        email: impl AsRef<str>,
        name: impl AsRef<str>,
    ) -> Result<Self, UserValidationError> {
        let email = email.as_ref().trim();
        if email.is_empty() || !email.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }

        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }

        Ok(Self {
            id,
            email: email.to_lowercase(),
            name: name.to_owned(),
        })
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Normalised email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDto {
    id: String,
    email: String,
    name: String,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User { id, email, name } = value;
        Self {
            id: id.into(),
            email,
            name,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        User::try_new(UserId::new(value.id)?, value.email, value.name)
    }
}
