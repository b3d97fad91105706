use serde_json::{Value, json};
use verdant_adapters::http::routes::UserSelfDetail;

use crate::helpers::{PASSWORD, TestApp, address};

#[tokio::test]
async fn register_returns_201_with_unverified_primary_email() {
    let app = TestApp::new().await;

    let response = app.register("gardener", "gardener@example.com").await;
    assert_eq!(response.status().as_u16(), 201);

    let detail: UserSelfDetail = response.json().await.unwrap();
    assert_eq!(detail.username, "gardener");
    assert_eq!(detail.emails.len(), 1);
    assert_eq!(detail.emails[0].address, "gardener@example.com");
    assert!(detail.emails[0].primary);
    assert!(!detail.emails[0].verified);
}

#[tokio::test]
async fn register_sends_confirmation_link() {
    let app = TestApp::new().await;
    app.register("gardener", "gardener@example.com").await;

    let key = app.confirmation_key("gardener@example.com").await;
    let sent = app
        .email_client
        .last_sent_to(&address("gardener@example.com"))
        .await
        .expect("No confirmation message sent");

    assert!(sent.content.contains(&key));
    assert!(sent.content.contains("confirm-email"));
}

#[tokio::test]
async fn register_rejects_taken_username_or_email() {
    let app = TestApp::new().await;
    app.register("gardener", "gardener@example.com").await;

    let same_email = app.register("other", "gardener@example.com").await;
    assert_eq!(same_email.status().as_u16(), 409);

    let same_username = app.register("gardener", "other@example.com").await;
    assert_eq!(same_username.status().as_u16(), 409);
}

#[tokio::test]
async fn register_rejects_invalid_input() {
    let app = TestApp::new().await;

    let cases = [
        json!({
            "username": "gardener",
            "email": "gardener@example.com",
            "password1": PASSWORD,
            "password2": "something else entirely",
        }),
        json!({
            "username": "gardener",
            "email": "not-an-address",
            "password1": PASSWORD,
            "password2": PASSWORD,
        }),
        json!({
            "username": "gardener",
            "email": "gardener@example.com",
            "password1": "short",
            "password2": "short",
        }),
        json!({
            "username": "no spaces allowed",
            "email": "gardener@example.com",
            "password1": PASSWORD,
            "password2": PASSWORD,
        }),
    ];

    for body in cases {
        let response = app.post_json("/users", &body).await;
        assert_eq!(response.status().as_u16(), 400, "body: {body}");

        let error: Value = response.json().await.unwrap();
        assert!(error["error"].is_string());
    }
    assert!(app.email_client.sent_emails().await.is_empty());
}
