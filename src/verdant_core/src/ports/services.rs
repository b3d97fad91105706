use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    email_address::EmailAddress,
    password::{Password, PasswordHash},
};

/// Port trait for email sending service
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &EmailAddress,
        subject: &str,
        content: &str,
    ) -> Result<(), String>;
}

#[derive(Debug, Error)]
#[error("Password hashing failed: {0}")]
pub struct PasswordHasherError(pub String);

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash_password(&self, password: Password) -> Result<PasswordHash, PasswordHasherError>;
}

/// Source of opaque confirmation keys.
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}
