use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use verdant_application::{
    ConfirmEmailError, DeliveryError, RegisterUserError, RequestEmailConfirmationError,
    RequestPasswordResetError, ResetPasswordError,
};
use verdant_core::{
    EmailAddressError, EmailError, PasswordError, PasswordHasherError, UserError,
    UserStoreError, UsernameError,
};

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AccountApiError {
    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Expired(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotDelivered(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl IntoResponse for AccountApiError {
    fn into_response(self) -> Response {
        let status_code = match self {
            AccountApiError::UserNotFound => StatusCode::NOT_FOUND,
            AccountApiError::UserAlreadyExists | AccountApiError::Conflict(_) => {
                StatusCode::CONFLICT
            }
            AccountApiError::Expired(_) => StatusCode::GONE,
            AccountApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AccountApiError::NotDelivered(ref e) => {
                tracing::warn!(error = %e, "Message was not delivered");
                StatusCode::SERVICE_UNAVAILABLE
            }
            AccountApiError::UnexpectedError(ref e) => {
                tracing::error!(error = %e, "Request failed unexpectedly");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status_code, body).into_response()
    }
}

impl From<UserStoreError> for AccountApiError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::UserAlreadyExists => AccountApiError::UserAlreadyExists,
            UserStoreError::UserNotFound => AccountApiError::UserNotFound,
            UserStoreError::VersionConflict => AccountApiError::Conflict(error.to_string()),
            UserStoreError::UnexpectedError(e) => AccountApiError::UnexpectedError(e),
        }
    }
}

impl From<EmailError> for AccountApiError {
    fn from(error: EmailError) -> Self {
        match error {
            EmailError::AlreadyVerified => AccountApiError::Conflict(error.to_string()),
            EmailError::ConfirmationExpired => AccountApiError::Expired(error.to_string()),
            EmailError::NoPendingConfirmation | EmailError::ConfirmationMismatch => {
                AccountApiError::InvalidInput(error.to_string())
            }
            EmailError::InvalidState(_) => AccountApiError::UnexpectedError(error.to_string()),
        }
    }
}

impl From<UserError> for AccountApiError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::Email(e) => e.into(),
            UserError::EmailNotFound => AccountApiError::UserNotFound,
            UserError::DuplicateEmail => AccountApiError::Conflict(error.to_string()),
            UserError::PasswordResetExpired => AccountApiError::Expired(error.to_string()),
            UserError::EmailNotVerified
            | UserError::NoPendingPasswordReset
            | UserError::PasswordResetMismatch => AccountApiError::InvalidInput(error.to_string()),
            UserError::PrimaryEmailCount(_) => {
                AccountApiError::UnexpectedError(error.to_string())
            }
        }
    }
}

impl From<PasswordHasherError> for AccountApiError {
    fn from(error: PasswordHasherError) -> Self {
        AccountApiError::UnexpectedError(error.to_string())
    }
}

impl From<DeliveryError> for AccountApiError {
    fn from(error: DeliveryError) -> Self {
        AccountApiError::UnexpectedError(error.to_string())
    }
}

impl From<EmailAddressError> for AccountApiError {
    fn from(error: EmailAddressError) -> Self {
        AccountApiError::InvalidInput(error.to_string())
    }
}

impl From<PasswordError> for AccountApiError {
    fn from(error: PasswordError) -> Self {
        AccountApiError::InvalidInput(error.to_string())
    }
}

impl From<UsernameError> for AccountApiError {
    fn from(error: UsernameError) -> Self {
        AccountApiError::InvalidInput(error.to_string())
    }
}

impl From<RegisterUserError> for AccountApiError {
    fn from(error: RegisterUserError) -> Self {
        match error {
            RegisterUserError::UserStoreError(e) => e.into(),
            RegisterUserError::UserError(e) => e.into(),
            RegisterUserError::PasswordHasherError(e) => e.into(),
        }
    }
}

impl From<RequestEmailConfirmationError> for AccountApiError {
    fn from(error: RequestEmailConfirmationError) -> Self {
        match error {
            RequestEmailConfirmationError::UserStoreError(e) => e.into(),
            RequestEmailConfirmationError::UserError(e) => e.into(),
            RequestEmailConfirmationError::DeliveryError(e) => e.into(),
            RequestEmailConfirmationError::NotDelivered(_) => {
                AccountApiError::NotDelivered(error.to_string())
            }
        }
    }
}

impl From<ConfirmEmailError> for AccountApiError {
    fn from(error: ConfirmEmailError) -> Self {
        match error {
            ConfirmEmailError::UserStoreError(e) => e.into(),
            ConfirmEmailError::UserError(e) => e.into(),
        }
    }
}

impl From<RequestPasswordResetError> for AccountApiError {
    fn from(error: RequestPasswordResetError) -> Self {
        match error {
            RequestPasswordResetError::UserStoreError(e) => e.into(),
            RequestPasswordResetError::DeliveryError(e) => e.into(),
            RequestPasswordResetError::NotDelivered(_) => {
                AccountApiError::NotDelivered(error.to_string())
            }
        }
    }
}

impl From<ResetPasswordError> for AccountApiError {
    fn from(error: ResetPasswordError) -> Self {
        match error {
            ResetPasswordError::UserStoreError(e) => e.into(),
            ResetPasswordError::UserError(e) => e.into(),
            ResetPasswordError::PasswordHasherError(e) => e.into(),
        }
    }
}
