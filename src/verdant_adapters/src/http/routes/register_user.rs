use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use verdant_application::{RegisterUserUseCase, VerificationPolicy};
use verdant_core::{
    EmailAddress, EmailClient, Password, PasswordHasher, TokenGenerator, UserStore, Username,
};

use super::error::AccountApiError;
use super::responses::UserSelfDetail;

#[derive(Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password1: Secret<String>,
    pub password2: Secret<String>,
}

#[tracing::instrument(name = "Register user", skip_all)]
pub async fn register_user<U, H, T, E>(
    State((user_store, password_hasher, token_generator, email_client, policy)): State<(
        U,
        H,
        T,
        E,
        Arc<VerificationPolicy>,
    )>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, AccountApiError>
where
    U: UserStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
    T: TokenGenerator + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    if request.password1.expose_secret() != request.password2.expose_secret() {
        return Err(AccountApiError::InvalidInput(
            "Passwords do not match".to_string(),
        ));
    }

    let username = Username::try_from(request.username)?;
    let address = EmailAddress::try_from(request.email)?;
    let password = Password::try_from(request.password1)?;

    let use_case = RegisterUserUseCase::new(
        user_store,
        password_hasher,
        token_generator,
        email_client,
        &policy,
    );
    let user = use_case.execute(username, address, password).await?;

    Ok((StatusCode::CREATED, Json(UserSelfDetail::from(&user))))
}
