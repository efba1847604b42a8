//! User entity.
//!
//! Users are provisioned on first successful login with the profile the
//! identity provider reported; the application never updates or deletes them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable user identifier (relational surrogate key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application user as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub picture: String,
}

/// User row to insert on first login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub picture: String,
}

/// Validation failures for provider-supplied profiles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must contain an @")]
    MalformedEmail,
    #[error("name must not be empty")]
    EmptyName,
}

impl NewUser {
    /// Validate and construct a [`NewUser`] from provider profile fields.
    ///
    /// The picture URL may be empty; some providers omit it.
    pub fn try_from_profile(
        name: impl Into<String>,
        email: impl Into<String>,
        picture: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        let email = email.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email.contains('@') {
            return Err(UserValidationError::MalformedEmail);
        }
        Ok(Self {
            name,
            email,
            picture: picture.into(),
        })
    }
}
