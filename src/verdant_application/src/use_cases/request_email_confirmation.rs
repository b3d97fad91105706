use chrono::Utc;
use verdant_core::{
    EmailAddress, EmailClient, EmailConfirmation, TokenGenerator, UserError, UserStore,
    UserStoreError,
};

use crate::{
    messages::{DeliveryError, Message},
    policy::VerificationPolicy,
};

/// Error types for request email confirmation use case
#[derive(Debug, thiserror::Error)]
pub enum RequestEmailConfirmationError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("User error: {0}")]
    UserError(#[from] UserError),
    #[error(transparent)]
    DeliveryError(#[from] DeliveryError),
    #[error(
        "The confirmation email could not be sent and any earlier key for this address is no \
         longer valid. Request a new confirmation: {0}"
    )]
    NotDelivered(#[source] DeliveryError),
}

/// Request email confirmation use case - issues a fresh key for an unverified
/// address and mails it
pub struct RequestEmailConfirmationUseCase<'a, U, T, E>
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

impl<'a, U, T, E> RequestEmailConfirmationUseCase<'a, U, T, E>
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

    /// Execute the request email confirmation use case
    ///
    /// Any outstanding key for the address stops working once the new one is
    /// stored. The message is rendered first, so a render failure leaves the
    /// old key in place. A send failure after the store returns
    /// [`RequestEmailConfirmationError::NotDelivered`].
    #[tracing::instrument(name = "RequestEmailConfirmationUseCase::execute", skip(self))]
    pub async fn execute(&self, address: EmailAddress) -> Result<(), RequestEmailConfirmationError> {
        let mut user = self.user_store.get_user_by_email(&address).await?;

        let now = Utc::now();
        let key = self.token_generator.generate();
        user.request_email_confirmation_at(&address, key.as_str(), now)?;

        let confirmation = EmailConfirmation::issued_at(key, now);
        let message =
            Message::email_confirmation(self.policy, user.username(), &address, &confirmation)?;

        self.user_store.update_user(user).await?;

        message
            .send(&self.email_client)
            .await
            .map_err(RequestEmailConfirmationError::NotDelivered)
    }
}
