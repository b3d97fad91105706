use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    email_address::EmailAddress,
    user::{User, UserId},
};

// UserStore port trait and errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("User was modified concurrently")]
    VersionConflict,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UserAlreadyExists, Self::UserAlreadyExists)
                | (Self::UserNotFound, Self::UserNotFound)
                | (Self::VersionConflict, Self::VersionConflict)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Persistence boundary for the [`User`] aggregate.
///
/// `update_user` is an optimistic write: it succeeds only while the stored
/// version equals `user.version()`, and bumps the stored version. This is
/// what keeps a confirmation key from being consumed twice by racing
/// requests.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `UserAlreadyExists` when the username or any address is
    /// already taken.
    async fn add_user(&self, user: User) -> Result<(), UserStoreError>;
    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError>;
    async fn get_user_by_email(&self, address: &EmailAddress) -> Result<User, UserStoreError>;
    async fn update_user(&self, user: User) -> Result<(), UserStoreError>;
}
