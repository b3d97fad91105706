use verdant_core::{
    EmailAddress, Password, PasswordHasher, PasswordHasherError, UserError, UserStore,
    UserStoreError,
};

use crate::policy::VerificationPolicy;

/// Error types for reset password use case
#[derive(Debug, thiserror::Error)]
pub enum ResetPasswordError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("User error: {0}")]
    UserError(#[from] UserError),
    #[error(transparent)]
    PasswordHasherError(#[from] PasswordHasherError),
}

/// Reset password use case - consumes a reset key and stores the new password
pub struct ResetPasswordUseCase<'a, U, H>
where
    U: UserStore,
    H: PasswordHasher,
{
    user_store: U,
    password_hasher: H,
    policy: &'a VerificationPolicy,
}

impl<'a, U, H> ResetPasswordUseCase<'a, U, H>
where
    U: UserStore,
    H: PasswordHasher,
{
    pub fn new(user_store: U, password_hasher: H, policy: &'a VerificationPolicy) -> Self {
        Self {
            user_store,
            password_hasher,
            policy,
        }
    }

    /// Execute the reset password use case
    ///
    /// # Arguments
    /// * `address` - An address owned by the account
    /// * `key` - The reset key from the message
    /// * `new_password` - The new password to set
    #[tracing::instrument(name = "ResetPasswordUseCase::execute", skip(self, key, new_password))]
    pub async fn execute(
        &self,
        address: EmailAddress,
        key: &str,
        new_password: Password,
    ) -> Result<(), ResetPasswordError> {
        let mut user = self.user_store.get_user_by_email(&address).await?;
        let expiry = self.policy.password_reset_expiry_hours;

        // Reject bad keys before paying for a hash
        user.check_password_reset(key, expiry)?;

        let password_hash = self.password_hasher.hash_password(new_password).await?;
        user.reset_password(key, password_hash, expiry)?;

        self.user_store.update_user(user).await?;

        Ok(())
    }
}
