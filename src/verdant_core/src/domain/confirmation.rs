use std::marker::PhantomData;

use chrono::{DateTime, TimeDelta, Utc};

mod sealed {
    pub trait Sealed {}
}

/// Tag distinguishing what a [`Confirmation`] proves.
///
/// Both kinds share structure and expiry behaviour; the tag only keeps an
/// email confirmation from being accepted where a password reset is expected.
pub trait ConfirmationKind: sealed::Sealed {
    const LABEL: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailVerification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordReset;

impl sealed::Sealed for EmailVerification {}
impl sealed::Sealed for PasswordReset {}

impl ConfirmationKind for EmailVerification {
    const LABEL: &'static str = "email confirmation";
}

impl ConfirmationKind for PasswordReset {
    const LABEL: &'static str = "password reset";
}

/// Single-use, time-bounded verification token.
///
/// Immutable once built. A new attempt always means a new `Confirmation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation<K> {
    key: String,
    created_at: DateTime<Utc>,
    kind: PhantomData<K>,
}

pub type EmailConfirmation = Confirmation<EmailVerification>;
pub type PasswordResetConfirmation = Confirmation<PasswordReset>;

impl<K: ConfirmationKind> Confirmation<K> {
    /// Creates a confirmation stamped with the current time.
    pub fn new(key: impl Into<String>) -> Self {
        Self::issued_at(key, Utc::now())
    }

    /// Creates a confirmation with an explicit creation time, used when
    /// rehydrating from storage.
    pub fn issued_at(key: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            created_at,
            kind: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn label(&self) -> &'static str {
        K::LABEL
    }

    /// Whether `key` is the one this confirmation was issued with.
    pub fn matches(&self, key: &str) -> bool {
        self.key == key
    }

    pub fn expires_at(&self, expiry_time_hours: u32) -> DateTime<Utc> {
        self.created_at + TimeDelta::hours(i64::from(expiry_time_hours))
    }

    /// Returns `false` once more than `expiry_time_hours` have elapsed since
    /// creation.
    pub fn is_valid(&self, expiry_time_hours: u32) -> bool {
        self.is_valid_at(expiry_time_hours, Utc::now())
    }

    pub fn is_valid_at(&self, expiry_time_hours: u32, now: DateTime<Utc>) -> bool {
        now - self.created_at <= TimeDelta::hours(i64::from(expiry_time_hours))
    }
}
