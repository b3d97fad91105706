use verdant_core::{Email, EmailAddress, UserError, UserStore, UserStoreError};

use crate::policy::VerificationPolicy;

/// Error types for confirm email use case
#[derive(Debug, thiserror::Error)]
pub enum ConfirmEmailError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("User error: {0}")]
    UserError(#[from] UserError),
}

/// Confirm email use case - consumes a confirmation key and marks the address
/// verified
pub struct ConfirmEmailUseCase<'a, U>
where
    U: UserStore,
{
    user_store: U,
    policy: &'a VerificationPolicy,
}

impl<'a, U> ConfirmEmailUseCase<'a, U>
where
    U: UserStore,
{
    pub fn new(user_store: U, policy: &'a VerificationPolicy) -> Self {
        Self { user_store, policy }
    }

    /// Execute the confirm email use case
    ///
    /// # Arguments
    /// * `address` - The address being confirmed
    /// * `key` - The key delivered to that address
    ///
    /// # Returns
    /// The verified email, or ConfirmEmailError. Two requests racing on the
    /// same key cannot both succeed: the slower write fails with
    /// `UserStoreError::VersionConflict`.
    #[tracing::instrument(name = "ConfirmEmailUseCase::execute", skip(self, key))]
    pub async fn execute(&self, address: EmailAddress, key: &str) -> Result<Email, ConfirmEmailError> {
        let mut user = self.user_store.get_user_by_email(&address).await?;

        let email = user
            .confirm_email(&address, key, self.policy.email_confirmation_expiry_hours)?
            .clone();

        self.user_store.update_user(user).await?;

        Ok(email)
    }
}
