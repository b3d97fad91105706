use chrono::Utc;
use verdant_core::{
    EmailAddress, EmailClient, EmailConfirmation, Password, PasswordHasher, PasswordHasherError,
    TokenGenerator, User, UserError, UserStore, UserStoreError, Username,
};

use crate::{messages::Message, policy::VerificationPolicy};

/// Error types for register user use case
#[derive(Debug, thiserror::Error)]
pub enum RegisterUserError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("User error: {0}")]
    UserError(#[from] UserError),
    #[error(transparent)]
    PasswordHasherError(#[from] PasswordHasherError),
}

/// Register user use case - creates the account and sends the first email
/// confirmation
pub struct RegisterUserUseCase<'a, U, H, T, E>
where
    U: UserStore,
    H: PasswordHasher,
    T: TokenGenerator,
    E: EmailClient,
{
    user_store: U,
    password_hasher: H,
    token_generator: T,
    email_client: E,
    policy: &'a VerificationPolicy,
}

impl<'a, U, H, T, E> RegisterUserUseCase<'a, U, H, T, E>
where
    U: UserStore,
    H: PasswordHasher,
    T: TokenGenerator,
    E: EmailClient,
{
    pub fn new(
        user_store: U,
        password_hasher: H,
        token_generator: T,
        email_client: E,
        policy: &'a VerificationPolicy,
    ) -> Self {
        Self {
            user_store,
            password_hasher,
            token_generator,
            email_client,
            policy,
        }
    }

    /// Execute the register user use case
    ///
    /// # Arguments
    /// * `username` - Validated username
    /// * `address` - Validated address, becomes the primary email
    /// * `password` - Validated password
    ///
    /// # Returns
    /// The stored user. A failed confirmation delivery does not undo the
    /// registration; the user can request another confirmation.
    #[tracing::instrument(name = "RegisterUserUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        username: Username,
        address: EmailAddress,
        password: Password,
    ) -> Result<User, RegisterUserError> {
        let password_hash = self.password_hasher.hash_password(password).await?;
        let mut user = User::register(username, address.clone(), password_hash);

        let now = Utc::now();
        let key = self.token_generator.generate();
        user.request_email_confirmation_at(&address, key.as_str(), now)?;

        self.user_store.add_user(user.clone()).await?;

        let confirmation = EmailConfirmation::issued_at(key, now);
        let delivery = async {
            Message::email_confirmation(self.policy, user.username(), &address, &confirmation)?
                .send(&self.email_client)
                .await
        };
        if let Err(e) = delivery.await {
            tracing::warn!(error = %e, user_id = %user.id(), "Email confirmation was not delivered");
        }

        Ok(user)
    }
}
