use secrecy::ExposeSecret;

use crate::helpers::{STALE_RESET_KEY, TestApp, address};

const EMAIL: &str = "gardener@example.com";
const NEW_PASSWORD: &str = "a brand new passphrase";

#[tokio::test]
async fn reset_password_flow() {
    let app = TestApp::new().await;
    app.register("gardener", EMAIL).await;
    let old_hash = app
        .stored_user(EMAIL)
        .await
        .password_hash()
        .as_ref()
        .expose_secret()
        .clone();

    let response = app.request_password_reset(EMAIL).await;
    assert_eq!(response.status().as_u16(), 202);

    let key = app.password_reset_key(EMAIL).await;
    let sent = app
        .email_client
        .last_sent_to(&address(EMAIL))
        .await
        .unwrap();
    assert!(sent.content.contains(&key));

    let response = app.reset_password(EMAIL, &key, NEW_PASSWORD).await;
    assert_eq!(response.status().as_u16(), 200);

    let user = app.stored_user(EMAIL).await;
    assert_ne!(user.password_hash().as_ref().expose_secret(), &old_hash);
    assert!(user.password_reset().is_none());
}

#[tokio::test]
async fn reset_key_cannot_be_reused() {
    let app = TestApp::new().await;
    app.register("gardener", EMAIL).await;
    app.request_password_reset(EMAIL).await;
    let key = app.password_reset_key(EMAIL).await;

    assert_eq!(
        app.reset_password(EMAIL, &key, NEW_PASSWORD)
            .await
            .status()
            .as_u16(),
        200
    );
    assert_eq!(
        app.reset_password(EMAIL, &key, "yet another passphrase")
            .await
            .status()
            .as_u16(),
        400
    );
}

#[tokio::test]
async fn reset_with_wrong_key_is_rejected() {
    let app = TestApp::new().await;
    app.register("gardener", EMAIL).await;
    app.request_password_reset(EMAIL).await;

    let response = app.reset_password(EMAIL, "not-the-key", NEW_PASSWORD).await;
    assert_eq!(response.status().as_u16(), 400);
    assert!(app.stored_user(EMAIL).await.password_reset().is_some());
}

#[tokio::test]
async fn expired_reset_is_gone() {
    let app = TestApp::new().await;
    app.seed_user_with_stale_keys("gardener", EMAIL).await;

    let response = app.reset_password(EMAIL, STALE_RESET_KEY, NEW_PASSWORD).await;
    assert_eq!(response.status().as_u16(), 410);
}

#[tokio::test]
async fn reset_for_unknown_address_is_not_found() {
    let app = TestApp::new().await;

    let response = app.request_password_reset("nobody@example.com").await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn reset_with_mismatched_passwords_is_rejected() {
    let app = TestApp::new().await;
    app.register("gardener", EMAIL).await;
    app.request_password_reset(EMAIL).await;
    let key = app.password_reset_key(EMAIL).await;

    let response = app
        .post_json(
            "/users/password-reset/confirm",
            &serde_json::json!({
                "email": EMAIL,
                "key": key,
                "password1": NEW_PASSWORD,
                "password2": "does not match",
            }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(app.stored_user(EMAIL).await.password_reset().is_some());
}
