use verdant_core::{EmailAddress, EmailClient, TokenGenerator, UserStore, UserStoreError};

use crate::{
    messages::{DeliveryError, Message},
    policy::VerificationPolicy,
};

/// Error types for request password reset use case
#[derive(Debug, thiserror::Error)]
pub enum RequestPasswordResetError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error(transparent)]
    DeliveryError(#[from] DeliveryError),
    #[error(
        "The password reset email could not be sent and any earlier reset key is no longer \
         valid. Request a new reset: {0}"
    )]
    NotDelivered(#[source] DeliveryError),
}

/// Request password reset use case - issues a reset key and mails it to the
/// account's primary address
pub struct RequestPasswordResetUseCase<'a, U, T, E>
where
    U: UserStore,
    T: TokenGenerator,
    E: EmailClient,
{
    user_store: U,
    token_generator: T,
    email_client: E,
    policy: &'a VerificationPolicy,
}

impl<'a, U, T, E> RequestPasswordResetUseCase<'a, U, T, E>
where
    U: UserStore,
    T: TokenGenerator,
    E: EmailClient,
{
    pub fn new(
        user_store: U,
        token_generator: T,
        email_client: E,
        policy: &'a VerificationPolicy,
    ) -> Self {
        Self {
            user_store,
            token_generator,
            email_client,
            policy,
        }
    }

    /// Execute the request password reset use case
    ///
    /// # Arguments
    /// * `address` - Any address owned by the account
    ///
    /// # Returns
    /// Ok(()) once the key is stored and mailed. The message always goes to
    /// the primary address, whichever address was submitted. A send failure
    /// after the store returns [`RequestPasswordResetError::NotDelivered`].
    #[tracing::instrument(name = "RequestPasswordResetUseCase::execute", skip(self))]
    pub async fn execute(&self, address: EmailAddress) -> Result<(), RequestPasswordResetError> {
        let mut user = self.user_store.get_user_by_email(&address).await?;

        let key = self.token_generator.generate();
        let confirmation = user.request_password_reset(key).clone();
        let message = Message::password_reset(
            self.policy,
            user.username(),
            user.primary_email().address(),
            &confirmation,
        )?;

        self.user_store.update_user(user).await?;

        message
            .send(&self.email_client)
            .await
            .map_err(RequestPasswordResetError::NotDelivered)
    }
}
