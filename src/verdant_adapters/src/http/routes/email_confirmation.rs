use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use verdant_application::{
    ConfirmEmailUseCase, RequestEmailConfirmationUseCase, VerificationPolicy,
};
use verdant_core::{EmailAddress, EmailClient, TokenGenerator, UserStore};

use super::error::AccountApiError;
use super::responses::EmailDetail;

#[derive(Deserialize)]
pub struct EmailConfirmationRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ConfirmEmailRequest {
    pub email: String,
    pub key: String,
}

#[tracing::instrument(name = "Request email confirmation", skip_all)]
pub async fn request_email_confirmation<U, T, E>(
    State((user_store, token_generator, email_client, policy)): State<(
        U,
        T,
        E,
        Arc<VerificationPolicy>,
    )>,
    Json(request): Json<EmailConfirmationRequest>,
) -> Result<impl IntoResponse, AccountApiError>
where
    U: UserStore + Clone + 'static,
    T: TokenGenerator + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let address = EmailAddress::try_from(request.email)?;

    let use_case =
        RequestEmailConfirmationUseCase::new(user_store, token_generator, email_client, &policy);
    use_case.execute(address).await?;

    Ok(StatusCode::ACCEPTED)
}

#[tracing::instrument(name = "Confirm email", skip_all)]
pub async fn confirm_email<U>(
    State((user_store, policy)): State<(U, Arc<VerificationPolicy>)>,
    Json(request): Json<ConfirmEmailRequest>,
) -> Result<impl IntoResponse, AccountApiError>
where
    U: UserStore + Clone + 'static,
{
    let address = EmailAddress::try_from(request.email)?;

    let use_case = ConfirmEmailUseCase::new(user_store, &policy);
    let email = use_case.execute(address, &request.key).await?;

    Ok((StatusCode::OK, Json(EmailDetail::from(&email))))
}
