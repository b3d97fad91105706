use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use verdant_application::{RequestPasswordResetUseCase, ResetPasswordUseCase, VerificationPolicy};
use verdant_core::{EmailAddress, EmailClient, Password, PasswordHasher, TokenGenerator, UserStore};

use super::error::AccountApiError;

#[derive(Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub key: String,
    pub password1: Secret<String>,
    pub password2: Secret<String>,
}

#[tracing::instrument(name = "Request password reset", skip_all)]
pub async fn request_password_reset<U, T, E>(
    State((user_store, token_generator, email_client, policy)): State<(
        U,
        T,
        E,
        Arc<VerificationPolicy>,
    )>,
    Json(request): Json<PasswordResetRequest>,
) -> Result<impl IntoResponse, AccountApiError>
where
    U: UserStore + Clone + 'static,
    T: TokenGenerator + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let address = EmailAddress::try_from(request.email)?;

    let use_case =
        RequestPasswordResetUseCase::new(user_store, token_generator, email_client, &policy);
    use_case.execute(address).await?;

    Ok(StatusCode::ACCEPTED)
}

#[tracing::instrument(name = "Reset password", skip_all)]
pub async fn reset_password<U, H>(
    State((user_store, password_hasher, policy)): State<(U, H, Arc<VerificationPolicy>)>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AccountApiError>
where
    U: UserStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
{
    if request.password1.expose_secret() != request.password2.expose_secret() {
        return Err(AccountApiError::InvalidInput(
            "Passwords do not match".to_string(),
        ));
    }

    let address = EmailAddress::try_from(request.email)?;
    let password = Password::try_from(request.password1)?;

    let use_case = ResetPasswordUseCase::new(user_store, password_hasher, &policy);
    use_case.execute(address, &request.key, password).await?;

    Ok(StatusCode::OK)
}
