use verdant_adapters::http::routes::EmailDetail;

use crate::helpers::{STALE_EMAIL_KEY, TestApp};

const EMAIL: &str = "gardener@example.com";

#[tokio::test]
async fn confirm_email_marks_address_verified() {
    let app = TestApp::new().await;
    app.register("gardener", EMAIL).await;
    let key = app.confirmation_key(EMAIL).await;

    let response = app.confirm_email(EMAIL, &key).await;
    assert_eq!(response.status().as_u16(), 200);

    let detail: EmailDetail = response.json().await.unwrap();
    assert!(detail.verified);
    assert!(detail.verified_at.is_some());

    let user = app.stored_user(EMAIL).await;
    let email = user.primary_email();
    assert!(email.verified());
    assert!(email.confirmation().is_none());
}

#[tokio::test]
async fn confirm_email_twice_is_a_conflict() {
    let app = TestApp::new().await;
    app.register("gardener", EMAIL).await;
    let key = app.confirmation_key(EMAIL).await;

    assert_eq!(app.confirm_email(EMAIL, &key).await.status().as_u16(), 200);
    assert_eq!(app.confirm_email(EMAIL, &key).await.status().as_u16(), 409);
}

#[tokio::test]
async fn confirm_email_with_wrong_key_is_rejected() {
    let app = TestApp::new().await;
    app.register("gardener", EMAIL).await;

    let response = app.confirm_email(EMAIL, "not-the-key").await;
    assert_eq!(response.status().as_u16(), 400);

    let user = app.stored_user(EMAIL).await;
    assert!(!user.primary_email().verified());
}

#[tokio::test]
async fn confirm_email_for_unknown_address_is_not_found() {
    let app = TestApp::new().await;

    let response = app.confirm_email("nobody@example.com", "key").await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn expired_confirmation_is_gone() {
    let app = TestApp::new().await;
    app.seed_user_with_stale_keys("gardener", EMAIL).await;

    let response = app.confirm_email(EMAIL, STALE_EMAIL_KEY).await;
    assert_eq!(response.status().as_u16(), 410);
}

#[tokio::test]
async fn requesting_a_new_confirmation_replaces_the_old_key() {
    let app = TestApp::new().await;
    app.register("gardener", EMAIL).await;
    let old_key = app.confirmation_key(EMAIL).await;

    let response = app.request_email_confirmation(EMAIL).await;
    assert_eq!(response.status().as_u16(), 202);

    let new_key = app.confirmation_key(EMAIL).await;
    assert_ne!(old_key, new_key);
    assert_eq!(app.email_client.sent_emails().await.len(), 2);

    assert_eq!(app.confirm_email(EMAIL, &old_key).await.status().as_u16(), 400);
    assert_eq!(app.confirm_email(EMAIL, &new_key).await.status().as_u16(), 200);
}

#[tokio::test]
async fn requesting_confirmation_for_verified_address_is_a_conflict() {
    let app = TestApp::new().await;
    app.register("gardener", EMAIL).await;
    let key = app.confirmation_key(EMAIL).await;
    app.confirm_email(EMAIL, &key).await;

    let response = app.request_email_confirmation(EMAIL).await;
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn requesting_confirmation_for_unknown_address_is_not_found() {
    let app = TestApp::new().await;

    let response = app.request_email_confirmation("nobody@example.com").await;
    assert_eq!(response.status().as_u16(), 404);
}
