use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{
    confirmation::PasswordResetConfirmation,
    email::{Email, EmailError},
    email_address::EmailAddress,
    password::PasswordHash,
    username::Username,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error("Email address not found on user")]
    EmailNotFound,
    #[error("Email address already belongs to user")]
    DuplicateEmail,
    #[error("Email address is not verified")]
    EmailNotVerified,
    #[error(transparent)]
    Email(#[from] EmailError),
    #[error("No password reset was requested")]
    NoPendingPasswordReset,
    #[error("Password reset key does not match")]
    PasswordResetMismatch,
    #[error("The password reset key is expired")]
    PasswordResetExpired,
    #[error("User must have exactly one primary email, found {0}")]
    PrimaryEmailCount(usize),
}

/// Every stored field of a [`User`], used to move users in and out of
/// persistence.
#[derive(Debug, Clone)]
pub struct UserParts {
    pub id: UserId,
    pub username: Username,
    pub password_hash: PasswordHash,
    pub emails: Vec<Email>,
    pub password_reset: Option<PasswordResetConfirmation>,
    pub created_at: DateTime<Utc>,
    pub version: u64,
}

/// User aggregate root.
///
/// Owns the user's emails and the outstanding password reset. Email values
/// are never edited in place: each change swaps in the value returned by the
/// corresponding [`Email`] transition.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    username: Username,
    password_hash: PasswordHash,
    emails: Vec<Email>,
    /// Index into `emails` of the single primary address.
    primary: usize,
    password_reset: Option<PasswordResetConfirmation>,
    created_at: DateTime<Utc>,
    version: u64,
}

impl User {
    /// A new user whose only email is unverified and primary.
    pub fn register(
        username: Username,
        address: EmailAddress,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            id: UserId::new(),
            username,
            password_hash,
            emails: vec![Email::new(address).make_primary()],
            primary: 0,
            password_reset: None,
            created_at: Utc::now(),
            version: 0,
        }
    }

    pub fn from_parts(parts: UserParts) -> Result<Self, UserError> {
        let primary_count = parts.emails.iter().filter(|e| e.primary()).count();
        let primary = match parts.emails.iter().position(|e| e.primary()) {
            Some(index) if primary_count == 1 => index,
            _ => return Err(UserError::PrimaryEmailCount(primary_count)),
        };

        for (index, email) in parts.emails.iter().enumerate() {
            if parts.emails[..index]
                .iter()
                .any(|other| other.address() == email.address())
            {
                return Err(UserError::DuplicateEmail);
            }
        }

        Ok(Self {
            id: parts.id,
            username: parts.username,
            password_hash: parts.password_hash,
            emails: parts.emails,
            primary,
            password_reset: parts.password_reset,
            created_at: parts.created_at,
            version: parts.version,
        })
    }

    pub fn into_parts(self) -> UserParts {
        UserParts {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            emails: self.emails,
            password_reset: self.password_reset,
            created_at: self.created_at,
            version: self.version,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    pub fn password_reset(&self) -> Option<&PasswordResetConfirmation> {
        self.password_reset.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn email(&self, address: &EmailAddress) -> Option<&Email> {
        self.emails.iter().find(|e| e.address() == address)
    }

    pub fn primary_email(&self) -> &Email {
        &self.emails[self.primary]
    }

    pub fn owns_address(&self, address: &EmailAddress) -> bool {
        self.email(address).is_some()
    }

    /// Adds a secondary, unverified address.
    pub fn add_email(&mut self, address: EmailAddress) -> Result<&Email, UserError> {
        if self.owns_address(&address) {
            return Err(UserError::DuplicateEmail);
        }
        self.emails.push(Email::new(address));
        Ok(&self.emails[self.emails.len() - 1])
    }

    pub fn request_email_confirmation(
        &mut self,
        address: &EmailAddress,
        key: impl Into<String>,
    ) -> Result<&Email, UserError> {
        self.request_email_confirmation_at(address, key, Utc::now())
    }

    pub fn request_email_confirmation_at(
        &mut self,
        address: &EmailAddress,
        key: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<&Email, UserError> {
        let key = key.into();
        self.replace_email(address, |email| email.new_confirmation_at(key, now))
    }

    pub fn confirm_email(
        &mut self,
        address: &EmailAddress,
        key: &str,
        expiry_time_hours: u32,
    ) -> Result<&Email, UserError> {
        self.confirm_email_at(address, key, expiry_time_hours, Utc::now())
    }

    pub fn confirm_email_at(
        &mut self,
        address: &EmailAddress,
        key: &str,
        expiry_time_hours: u32,
        now: DateTime<Utc>,
    ) -> Result<&Email, UserError> {
        self.replace_email(address, |email| email.confirm_at(key, expiry_time_hours, now))
    }

    /// Moves the primary flag to `address`, which must already be verified.
    pub fn set_primary_email(&mut self, address: &EmailAddress) -> Result<(), UserError> {
        let target = self
            .emails
            .iter()
            .position(|e| e.address() == address)
            .ok_or(UserError::EmailNotFound)?;
        if !self.emails[target].verified() {
            return Err(UserError::EmailNotVerified);
        }
        if target == self.primary {
            return Ok(());
        }

        self.emails[self.primary] = self.emails[self.primary].make_unprimary();
        self.emails[target] = self.emails[target].make_primary();
        self.primary = target;

        Ok(())
    }

    /// Starts a password reset, superseding any outstanding one.
    pub fn request_password_reset(&mut self, key: impl Into<String>) -> &PasswordResetConfirmation {
        self.request_password_reset_at(key, Utc::now())
    }

    pub fn request_password_reset_at(
        &mut self,
        key: impl Into<String>,
        now: DateTime<Utc>,
    ) -> &PasswordResetConfirmation {
        self.password_reset
            .insert(PasswordResetConfirmation::issued_at(key, now))
    }

    /// Checks `key` against the outstanding reset without consuming it.
    pub fn check_password_reset(&self, key: &str, expiry_time_hours: u32) -> Result<(), UserError> {
        self.check_password_reset_at(key, expiry_time_hours, Utc::now())
    }

    pub fn check_password_reset_at(
        &self,
        key: &str,
        expiry_time_hours: u32,
        now: DateTime<Utc>,
    ) -> Result<(), UserError> {
        let confirmation = self
            .password_reset
            .as_ref()
            .ok_or(UserError::NoPendingPasswordReset)?;

        if !confirmation.matches(key) {
            return Err(UserError::PasswordResetMismatch);
        }
        if !confirmation.is_valid_at(expiry_time_hours, now) {
            return Err(UserError::PasswordResetExpired);
        }
        Ok(())
    }

    pub fn reset_password(
        &mut self,
        key: &str,
        new_password_hash: PasswordHash,
        expiry_time_hours: u32,
    ) -> Result<(), UserError> {
        self.reset_password_at(key, new_password_hash, expiry_time_hours, Utc::now())
    }

    pub fn reset_password_at(
        &mut self,
        key: &str,
        new_password_hash: PasswordHash,
        expiry_time_hours: u32,
        now: DateTime<Utc>,
    ) -> Result<(), UserError> {
        self.check_password_reset_at(key, expiry_time_hours, now)?;

        self.password_hash = new_password_hash;
        self.password_reset = None;
        Ok(())
    }

    /// Called by stores once a write of this user has been committed.
    pub fn mark_persisted(&mut self) {
        self.version += 1;
    }

    fn replace_email<F>(&mut self, address: &EmailAddress, transition: F) -> Result<&Email, UserError>
    where
        F: FnOnce(&Email) -> Result<Email, EmailError>,
    {
        let index = self
            .emails
            .iter()
            .position(|e| e.address() == address)
            .ok_or(UserError::EmailNotFound)?;

        let replacement = transition(&self.emails[index])?;
        self.emails[index] = replacement;
        Ok(&self.emails[index])
    }
}
