use std::{fmt, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

const MAX_ADDRESS_LENGTH: usize = 254;

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email address pattern is valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailAddressError {
    #[error("Email address is empty")]
    Empty,
    #[error("Email address is longer than {MAX_ADDRESS_LENGTH} characters")]
    TooLong,
    #[error("Invalid email address: {0}")]
    Malformed(String),
}

/// A syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let address = value.trim();

        if address.is_empty() {
            return Err(EmailAddressError::Empty);
        }
        if address.len() > MAX_ADDRESS_LENGTH {
            return Err(EmailAddressError::TooLong);
        }
        if !ADDRESS_RE.is_match(address) {
            return Err(EmailAddressError::Malformed(address.to_string()));
        }

        Ok(Self(address.to_string()))
    }
}

impl TryFrom<&str> for EmailAddress {
    type Error = EmailAddressError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_string())
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
