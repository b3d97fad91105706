use color_eyre::eyre::Result;
use reqwest::Client as HttpClient;
use tokio::net::TcpListener;
use verdant_account_service::{AccountService, configure_postgresql, init_tracing};
use verdant_adapters::{
    config::AccountServiceSetting,
    email::PostmarkEmailClient,
    persistence::PostgresUserStore,
    security::{Argon2PasswordHasher, RandomTokenGenerator},
};
use verdant_core::EmailAddress;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = AccountServiceSetting::load()?;

    let pg_pool = configure_postgresql(&settings.postgres).await?;
    let user_store = PostgresUserStore::new(pg_pool);

    let http_client = HttpClient::builder()
        .timeout(settings.email_client.timeout())
        .build()?;

    let email_client = PostmarkEmailClient::new(
        settings.email_client.base_url.clone(),
        EmailAddress::try_from(settings.email_client.sender.as_str())?,
        settings.email_client.auth_token.clone(),
        http_client,
    );

    let account_service = AccountService::new(
        user_store,
        Argon2PasswordHasher::new(),
        RandomTokenGenerator::new(settings.verification.token_length),
        email_client,
        settings.verification.policy()?,
    );

    let listener = TcpListener::bind(&settings.application.address).await?;
    tracing::info!("Starting account service...");

    account_service
        .run_standalone(listener, Some(settings.application.allowed_origins.clone()))
        .await?;

    Ok(())
}
