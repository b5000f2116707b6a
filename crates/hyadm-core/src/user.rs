//! User identity and validation.

/// Validation error for a [`User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    /// Username is empty.
    #[error("username is required")]
    EmptyUsername,

    /// Password is empty.
    #[error("password is required")]
    EmptyPassword,
}

/// A user entry under `auth.userpass`.
///
/// Construction through [`User::new`] guarantees both fields are non-empty.
/// Uniqueness of usernames is the repository's concern, not this type's.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    username: String,
    password: String,
}

impl User {
    /// Create a validated user.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, UserError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(UserError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(UserError::EmptyPassword);
        }
        Ok(Self { username, password })
    }

    #[inline]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[inline]
    pub fn password(&self) -> &str {
        &self.password
    }
}

// Password stays out of logs.
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
