//! User repository trait.

use std::sync::Arc;

use async_trait::async_trait;
use hyadm_core::{ConnectionParams, User};

use crate::error::StoreError;

/// User-lifecycle operations over the server document.
///
/// Every call is a complete read-modify-write cycle: a failure leaves the
/// stored document as it was.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Append a user under `auth.userpass`.
    ///
    /// Fails with [`StoreError::UserAlreadyExists`] when the username is taken.
    async fn add_user(&self, user: &User) -> Result<(), StoreError>;

    /// Replace the password of an existing user.
    async fn rotate_password(&self, user: &User) -> Result<(), StoreError>;

    /// Delete a user, keeping the order of the remaining entries.
    async fn remove_user(&self, username: &str) -> Result<(), StoreError>;

    /// All usernames, sorted ascending.
    async fn list_users(&self) -> Result<Vec<String>, StoreError>;

    /// Assemble the client connection parameters for one user.
    async fn connection_params(&self, username: &str) -> Result<ConnectionParams, StoreError>;
}

#[async_trait]
impl<R: UserRepository + ?Sized> UserRepository for Arc<R> {
    #[inline]
    async fn add_user(&self, user: &User) -> Result<(), StoreError> {
        (**self).add_user(user).await
    }

    #[inline]
    async fn rotate_password(&self, user: &User) -> Result<(), StoreError> {
        (**self).rotate_password(user).await
    }

    #[inline]
    async fn remove_user(&self, username: &str) -> Result<(), StoreError> {
        (**self).remove_user(username).await
    }

    #[inline]
    async fn list_users(&self) -> Result<Vec<String>, StoreError> {
        (**self).list_users().await
    }

    #[inline]
    async fn connection_params(&self, username: &str) -> Result<ConnectionParams, StoreError> {
        (**self).connection_params(username).await
    }
}
