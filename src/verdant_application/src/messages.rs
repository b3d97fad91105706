//! Outgoing account messages.

use askama::Template;
use chrono::{DateTime, Utc};
use verdant_core::{
    EmailAddress, EmailClient, EmailConfirmation, PasswordResetConfirmation, Username,
};

use crate::policy::VerificationPolicy;

pub const EMAIL_CONFIRMATION_SUBJECT: &str = "Confirm your email address";
pub const PASSWORD_RESET_SUBJECT: &str = "Reset your password";

const EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Failed to build link: {0}")]
    Link(#[from] url::ParseError),
    #[error("Failed to render message: {0}")]
    Render(#[from] askama::Error),
    #[error("Failed to send email: {0}")]
    Send(String),
}

#[derive(Template)]
#[template(path = "email_confirmation.html")]
struct EmailConfirmationMessage<'a> {
    username: &'a str,
    link: &'a str,
    expires_at: &'a str,
}

#[derive(Template)]
#[template(path = "password_reset.html")]
struct PasswordResetMessage<'a> {
    username: &'a str,
    link: &'a str,
    expires_at: &'a str,
}

/// A rendered message, ready to hand to an [`EmailClient`].
///
/// Rendering is separate from sending so callers can build the message
/// before they persist the key it carries.
#[derive(Debug, Clone)]
pub struct Message {
    kind: &'static str,
    recipient: EmailAddress,
    subject: &'static str,
    content: String,
}

impl Message {
    pub fn email_confirmation(
        policy: &VerificationPolicy,
        username: &Username,
        recipient: &EmailAddress,
        confirmation: &EmailConfirmation,
    ) -> Result<Self, DeliveryError> {
        let link = policy.email_confirmation_link(recipient, confirmation.key())?;
        let expires_at =
            format_expiry(confirmation.expires_at(policy.email_confirmation_expiry_hours));

        let content = EmailConfirmationMessage {
            username: username.as_str(),
            link: link.as_str(),
            expires_at: &expires_at,
        }
        .render()?;

        Ok(Self {
            kind: confirmation.label(),
            recipient: recipient.clone(),
            subject: EMAIL_CONFIRMATION_SUBJECT,
            content,
        })
    }

    pub fn password_reset(
        policy: &VerificationPolicy,
        username: &Username,
        recipient: &EmailAddress,
        confirmation: &PasswordResetConfirmation,
    ) -> Result<Self, DeliveryError> {
        let link = policy.password_reset_link(recipient, confirmation.key())?;
        let expires_at = format_expiry(confirmation.expires_at(policy.password_reset_expiry_hours));

        let content = PasswordResetMessage {
            username: username.as_str(),
            link: link.as_str(),
            expires_at: &expires_at,
        }
        .render()?;

        Ok(Self {
            kind: confirmation.label(),
            recipient: recipient.clone(),
            subject: PASSWORD_RESET_SUBJECT,
            content,
        })
    }

    pub fn recipient(&self) -> &EmailAddress {
        &self.recipient
    }

    pub fn subject(&self) -> &str {
        self.subject
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    #[tracing::instrument(name = "Sending account message", skip_all, fields(kind = self.kind))]
    pub async fn send<E>(&self, email_client: &E) -> Result<(), DeliveryError>
    where
        E: EmailClient,
    {
        email_client
            .send_email(&self.recipient, self.subject, &self.content)
            .await
            .map_err(DeliveryError::Send)?;

        tracing::debug!(recipient = %self.recipient, "Sent {}", self.kind);
        Ok(())
    }
}

fn format_expiry(expires_at: DateTime<Utc>) -> String {
    expires_at.format(EXPIRY_FORMAT).to_string()
}
