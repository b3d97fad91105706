use chrono::{TimeDelta, Utc};
use secrecy::Secret;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;
use verdant_account_service::AccountService;
use verdant_adapters::{
    config::test,
    email::MockEmailClient,
    persistence::HashMapUserStore,
    security::{Argon2PasswordHasher, RandomTokenGenerator},
};
use verdant_application::VerificationPolicy;
use verdant_core::{
    Email, EmailAddress, EmailConfirmation, PasswordHash, PasswordResetConfirmation, User,
    UserStore, Username,
};

pub const PASSWORD: &str = "correct horse battery";
pub const STALE_EMAIL_KEY: &str = "stale-email-key";
pub const STALE_RESET_KEY: &str = "stale-reset-key";

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub user_store: HashMapUserStore,
    pub email_client: MockEmailClient,
}

impl TestApp {
    pub async fn new() -> Self {
        let user_store = HashMapUserStore::new();
        let email_client = MockEmailClient::new();
        let policy = VerificationPolicy::new(
            24,
            2,
            Url::parse("https://verdant.test/account/").unwrap(),
        );

        let account_service = AccountService::new(
            user_store.clone(),
            Argon2PasswordHasher::new(),
            RandomTokenGenerator::default(),
            email_client.clone(),
            policy,
        );

        let listener = TcpListener::bind(test::APP_ADDRESS).await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(account_service.run_standalone(listener, None));

        Self {
            address,
            http_client: reqwest::Client::new(),
            user_store,
            email_client,
        }
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn register(&self, username: &str, email: &str) -> reqwest::Response {
        self.post_json(
            "/users",
            &json!({
                "username": username,
                "email": email,
                "password1": PASSWORD,
                "password2": PASSWORD,
            }),
        )
        .await
    }

    pub async fn request_email_confirmation(&self, email: &str) -> reqwest::Response {
        self.post_json("/users/email/confirmation", &json!({ "email": email }))
            .await
    }

    pub async fn confirm_email(&self, email: &str, key: &str) -> reqwest::Response {
        self.post_json(
            "/users/email/confirmation/confirm",
            &json!({ "email": email, "key": key }),
        )
        .await
    }

    pub async fn request_password_reset(&self, email: &str) -> reqwest::Response {
        self.post_json("/users/password-reset", &json!({ "email": email }))
            .await
    }

    pub async fn reset_password(&self, email: &str, key: &str, password: &str) -> reqwest::Response {
        self.post_json(
            "/users/password-reset/confirm",
            &json!({
                "email": email,
                "key": key,
                "password1": password,
                "password2": password,
            }),
        )
        .await
    }

    pub async fn stored_user(&self, email: &str) -> User {
        self.user_store
            .get_user_by_email(&address(email))
            .await
            .unwrap()
    }

    pub async fn confirmation_key(&self, email: &str) -> String {
        let user = self.stored_user(email).await;
        user.email(&address(email))
            .and_then(|e| e.confirmation())
            .map(|c| c.key().to_string())
            .expect("No pending confirmation")
    }

    pub async fn password_reset_key(&self, email: &str) -> String {
        self.stored_user(email)
            .await
            .password_reset()
            .map(|c| c.key().to_string())
            .expect("No pending password reset")
    }

    /// Inserts a user whose email confirmation and password reset were both
    /// issued two days ago.
    pub async fn seed_user_with_stale_keys(&self, username: &str, email: &str) {
        let address = address(email);
        let user = User::register(
            Username::try_from(username.to_string()).unwrap(),
            address.clone(),
            PasswordHash::new(Secret::from("unused".to_string())),
        );

        let issued = Utc::now() - TimeDelta::hours(48);
        let mut parts = user.into_parts();
        parts.emails = vec![
            Email::restore(
                address,
                false,
                true,
                Some(EmailConfirmation::issued_at(STALE_EMAIL_KEY, issued)),
                None,
            )
            .unwrap(),
        ];
        parts.password_reset = Some(PasswordResetConfirmation::issued_at(STALE_RESET_KEY, issued));

        self.user_store
            .add_user(User::from_parts(parts).unwrap())
            .await
            .unwrap();
    }
}

pub fn address(email: &str) -> EmailAddress {
    EmailAddress::try_from(email).unwrap()
}
