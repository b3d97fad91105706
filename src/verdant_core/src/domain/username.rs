use std::{fmt, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 32;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("username pattern is valid"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters")]
    InvalidLength,
    #[error("Username may only contain letters, digits, '_', '.' and '-'")]
    InvalidCharacters,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let length = value.chars().count();
        if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
            return Err(UsernameError::InvalidLength);
        }
        if !USERNAME_RE.is_match(&value) {
            return Err(UsernameError::InvalidCharacters);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
