use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,
    #[error("Password must be at most {MAX_PASSWORD_LENGTH} characters")]
    TooLong,
}

/// A plaintext password that passed length validation.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl TryFrom<Secret<String>> for Password {
    type Error = PasswordError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        let length = value.expose_secret().chars().count();

        if length < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(PasswordError::TooLong);
        }

        Ok(Self(value))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

/// Output of a password hasher, usually a PHC string.
#[derive(Debug, Clone)]
pub struct PasswordHash(Secret<String>);

impl PasswordHash {
    pub fn new(hash: Secret<String>) -> Self {
        Self(hash)
    }
}

impl AsRef<Secret<String>> for PasswordHash {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
