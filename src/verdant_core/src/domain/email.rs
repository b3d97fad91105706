use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{confirmation::EmailConfirmation, email_address::EmailAddress};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email is already verified")]
    AlreadyVerified,
    #[error("The email confirmation key is expired")]
    ConfirmationExpired,
    #[error("Email has no pending confirmation")]
    NoPendingConfirmation,
    #[error("Email confirmation key does not match")]
    ConfirmationMismatch,
    #[error("Invalid email state: {0}")]
    InvalidState(&'static str),
}

/// An address owned by a user, together with its verification state.
///
/// `Email` is a value: every transition returns a new `Email` and leaves the
/// receiver untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    address: EmailAddress,
    verified: bool,
    primary: bool,
    confirmation: Option<EmailConfirmation>,
    verified_at: Option<DateTime<Utc>>,
}

impl Email {
    /// A fresh, unverified, non-primary address.
    pub fn new(address: EmailAddress) -> Self {
        Self {
            address,
            verified: false,
            primary: false,
            confirmation: None,
            verified_at: None,
        }
    }

    /// Rebuilds an email from stored fields, rejecting combinations that
    /// the transitions can never produce.
    pub fn restore(
        address: EmailAddress,
        verified: bool,
        primary: bool,
        confirmation: Option<EmailConfirmation>,
        verified_at: Option<DateTime<Utc>>,
    ) -> Result<Self, EmailError> {
        if verified != verified_at.is_some() {
            return Err(EmailError::InvalidState(
                "verified_at must be set exactly when verified",
            ));
        }
        if verified && confirmation.is_some() {
            return Err(EmailError::InvalidState(
                "verified email cannot carry a confirmation",
            ));
        }

        Ok(Self {
            address,
            verified,
            primary,
            confirmation,
            verified_at,
        })
    }

    pub fn address(&self) -> &EmailAddress {
        &self.address
    }

    pub fn verified(&self) -> bool {
        self.verified
    }

    pub fn primary(&self) -> bool {
        self.primary
    }

    pub fn confirmation(&self) -> Option<&EmailConfirmation> {
        self.confirmation.as_ref()
    }

    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.verified_at
    }

    /// Attaches a new confirmation, superseding any outstanding one.
    pub fn new_confirmation(&self, key: impl Into<String>) -> Result<Self, EmailError> {
        self.new_confirmation_at(key, Utc::now())
    }

    pub fn new_confirmation_at(
        &self,
        key: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, EmailError> {
        if self.verified {
            return Err(EmailError::AlreadyVerified);
        }

        Ok(Self {
            confirmation: Some(EmailConfirmation::issued_at(key, now)),
            ..self.clone()
        })
    }

    /// Marks the address verified and drops the confirmation.
    ///
    /// Does not look at the confirmation key or its age; see [`Email::confirm`].
    pub fn verify(&self) -> Result<Self, EmailError> {
        self.verify_at(Utc::now())
    }

    pub fn verify_at(&self, now: DateTime<Utc>) -> Result<Self, EmailError> {
        if self.verified {
            return Err(EmailError::AlreadyVerified);
        }

        Ok(Self {
            verified: true,
            confirmation: None,
            verified_at: Some(now),
            ..self.clone()
        })
    }

    pub fn check_confirmation_expired(&self, expiry_time_hours: u32) -> Result<(), EmailError> {
        self.check_confirmation_expired_at(expiry_time_hours, Utc::now())
    }

    pub fn check_confirmation_expired_at(
        &self,
        expiry_time_hours: u32,
        now: DateTime<Utc>,
    ) -> Result<(), EmailError> {
        match &self.confirmation {
            Some(confirmation) if !confirmation.is_valid_at(expiry_time_hours, now) => {
                Err(EmailError::ConfirmationExpired)
            }
            _ => Ok(()),
        }
    }

    /// Verifies the address with a submitted key.
    ///
    /// The key must match the outstanding confirmation, which must not be
    /// older than `expiry_time_hours`.
    pub fn confirm(&self, key: &str, expiry_time_hours: u32) -> Result<Self, EmailError> {
        self.confirm_at(key, expiry_time_hours, Utc::now())
    }

    pub fn confirm_at(
        &self,
        key: &str,
        expiry_time_hours: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, EmailError> {
        if self.verified {
            return Err(EmailError::AlreadyVerified);
        }

        let confirmation = self
            .confirmation
            .as_ref()
            .ok_or(EmailError::NoPendingConfirmation)?;

        if !confirmation.matches(key) {
            return Err(EmailError::ConfirmationMismatch);
        }

        self.check_confirmation_expired_at(expiry_time_hours, now)?;
        self.verify_at(now)
    }

    pub fn make_primary(&self) -> Self {
        Self {
            primary: true,
            ..self.clone()
        }
    }

    pub fn make_unprimary(&self) -> Self {
        Self {
            primary: false,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    fn email() -> Email {
        Email::new(EmailAddress::try_from("a@x.com").unwrap())
    }

    fn verified_email() -> Email {
        email().verify().unwrap()
    }

    #[test]
    fn test_new_email_is_unverified_and_not_primary() {
        let email = email();
        assert!(!email.verified());
        assert!(!email.primary());
        assert!(email.confirmation().is_none());
        assert!(email.verified_at().is_none());
    }

    #[test]
    fn test_new_confirmation_sets_key() {
        let original = email();
        let confirmed = original.new_confirmation("tok1").unwrap();

        assert_eq!(confirmed.confirmation().unwrap().key(), "tok1");
        assert!(!confirmed.verified());
        // the receiver is untouched
        assert!(original.confirmation().is_none());
    }

    #[test]
    fn test_new_confirmation_replaces_outstanding_one() {
        let first = email().new_confirmation("tok1").unwrap();
        let second = first.new_confirmation("tok2").unwrap();

        assert_eq!(second.confirmation().unwrap().key(), "tok2");
        assert!(matches!(
            second.confirm("tok1", 24),
            Err(EmailError::ConfirmationMismatch)
        ));
    }

    #[test]
    fn test_verify_clears_confirmation_and_sets_timestamp() {
        let verified = email().new_confirmation("tok1").unwrap().verify().unwrap();

        assert!(verified.verified());
        assert!(verified.confirmation().is_none());
        assert!(verified.verified_at().is_some());
    }

    #[test]
    fn test_verified_email_rejects_confirmation_and_verification() {
        let verified = verified_email();

        assert_eq!(
            verified.new_confirmation("tok"),
            Err(EmailError::AlreadyVerified)
        );
        assert_eq!(verified.verify(), Err(EmailError::AlreadyVerified));
    }

    #[test]
    fn test_check_confirmation_expired_without_confirmation_is_ok() {
        assert!(email().check_confirmation_expired(0).is_ok());
        assert!(verified_email().check_confirmation_expired(0).is_ok());
    }

    #[test]
    fn test_check_confirmation_expired() {
        let issued = Utc::now() - TimeDelta::hours(25);
        let email = email().new_confirmation_at("tok", issued).unwrap();

        assert_eq!(
            email.check_confirmation_expired(24),
            Err(EmailError::ConfirmationExpired)
        );
        assert!(email.check_confirmation_expired(48).is_ok());
    }

    #[test]
    fn test_confirm_success() {
        let email = email().new_confirmation("tok").unwrap();
        let confirmed = email.confirm("tok", 24).unwrap();

        assert!(confirmed.verified());
        assert!(confirmed.confirmation().is_none());
    }

    #[test]
    fn test_confirm_without_pending_confirmation() {
        assert_eq!(
            email().confirm("tok", 24),
            Err(EmailError::NoPendingConfirmation)
        );
    }

    #[test]
    fn test_confirm_expired_key() {
        let issued = Utc::now() - TimeDelta::hours(25);
        let email = email().new_confirmation_at("tok", issued).unwrap();

        assert_eq!(
            email.confirm("tok", 24),
            Err(EmailError::ConfirmationExpired)
        );
    }

    #[test]
    fn test_primary_flag_round_trip() {
        let primary = email().make_primary();
        assert!(primary.primary());
        assert!(!primary.make_unprimary().primary());
    }

    #[test]
    fn test_restore_rejects_inconsistent_state() {
        let address = EmailAddress::try_from("a@x.com").unwrap();

        assert!(Email::restore(address.clone(), true, false, None, None).is_err());
        assert!(Email::restore(address.clone(), false, false, None, Some(Utc::now())).is_err());
        assert!(
            Email::restore(
                address.clone(),
                true,
                false,
                Some(EmailConfirmation::new("tok")),
                Some(Utc::now())
            )
            .is_err()
        );
        assert!(Email::restore(address, true, true, None, Some(Utc::now())).is_ok());
    }

    #[quickcheck]
    fn prop_new_confirmation_keeps_key(key: String) -> bool {
        let email = email().new_confirmation(key.clone()).unwrap();
        email.confirmation().map(|c| c.key() == key).unwrap_or(false) && !email.verified()
    }

    #[quickcheck]
    fn prop_verify_never_succeeds_twice(key: Option<String>) -> TestResult {
        let email = match key {
            Some(key) => email().new_confirmation(key).unwrap(),
            None => email(),
        };

        let Ok(verified) = email.verify() else {
            return TestResult::failed();
        };
        TestResult::from_bool(verified.verify() == Err(EmailError::AlreadyVerified))
    }
}
