use crate::helpers::{spawn_app, spawn_app_with};
use transluga::configuration::BackendKind;
use transluga::coordinator::NotificationMode;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn subscribe_returns_a_200_for_valid_form_data() {
    // Arrange
    let app = spawn_app().await;
    let body = "email=ursula_le_guin%40gmail.com&accepted_privacy_policy=on";

    // Act
    let response = app.post_newsletter(body.into()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    assert!(response.headers().contains_key("x-request-id"));
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "subscribed");
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn subscribe_persists_the_new_subscriber() {
    // Arrange
    let app = spawn_app().await;
    let body = "email=Ursula_Le_Guin%40gmail.com&accepted_privacy_policy=on";

    // Act
    app.post_newsletter(body.into()).await;

    // Assert
    let saved = app.subscribers().await;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].fields["email"], "ursula_le_guin@gmail.com");
    assert_eq!(saved[0].fields["acceptedPrivacyPolicy"], true);
    assert_eq!(saved[0].fields["skipEmailConfirmation"], false);
}

#[tokio::test]
async fn subscribing_twice_reports_already_subscribed() {
    // Arrange
    let app = spawn_app().await;
    let body = "email=a%40b.com&accepted_privacy_policy=on";

    // Act
    let first: serde_json::Value = app.post_newsletter(body.into()).await.json().await.unwrap();
    let second: serde_json::Value = app.post_newsletter(body.into()).await.json().await.unwrap();

    // Assert
    assert_eq!(second["status"], "already_subscribed");
    assert_eq!(second["id"], first["id"]);
    assert_eq!(app.subscribers().await.len(), 1);
}

#[tokio::test]
async fn subscribing_twice_creates_a_duplicate_when_the_check_is_disabled() {
    // Arrange
    let app = spawn_app_with(|c| c.submission.duplicate_check = false).await;
    let body = "email=a%40b.com&accepted_privacy_policy=on";

    // Act
    app.post_newsletter(body.into()).await;
    let response = app.post_newsletter(body.into()).await;

    // Assert
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "subscribed");
    assert_eq!(app.subscribers().await.len(), 2);
}

#[tokio::test]
async fn subscribe_returns_a_400_when_data_is_missing_or_invalid() {
    // Arrange
    let app = spawn_app().await;
    let test_cases = vec![
        ("accepted_privacy_policy=on", "missing the email"),
        ("email=a%40b.com", "missing the consent"),
        ("email=a%40b.com&accepted_privacy_policy=off", "consent not given"),
        ("email=definitely-not-an-email&accepted_privacy_policy=on", "invalid email"),
        ("email=a%20b%40c.com&accepted_privacy_policy=on", "whitespace in email"),
    ];

    for (invalid_body, error_message) in test_cases {
        // Act
        let response = app.post_newsletter(invalid_body.into()).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "invalid");
    }
    assert!(app.subscribers().await.is_empty());
}

#[tokio::test]
async fn direct_notification_submits_the_lead_to_the_relay() {
    // Arrange
    let app = spawn_app_with(|c| c.submission.notification = NotificationMode::Direct).await;

    Mock::given(path("/f/xandgakg"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.relay_server)
        .await;

    // Act
    let response = app
        .post_newsletter("email=a%40b.com&accepted_privacy_policy=on".into())
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let saved = app.subscribers().await;
    assert_eq!(saved[0].fields["skipEmailConfirmation"], true);

    let requests = app.relay_server.received_requests().await.unwrap();
    let fields: std::collections::HashMap<String, String> =
        serde_urlencoded::from_bytes(&requests[0].body).unwrap();
    assert_eq!(fields["email"], "a@b.com");
    assert_eq!(fields["_cc"], "calvezgobbi@gmail.com");
    assert!(fields.contains_key("_autoresponse"));
}

#[tokio::test]
async fn relay_failure_does_not_fail_a_persisted_subscription() {
    // Arrange
    let app = spawn_app_with(|c| c.submission.notification = NotificationMode::Direct).await;

    Mock::given(path("/f/xandgakg"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.relay_server)
        .await;

    // Act
    let response = app
        .post_newsletter("email=a%40b.com&accepted_privacy_policy=on".into())
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    assert_eq!(app.subscribers().await.len(), 1);
}

#[tokio::test]
async fn watcher_mode_never_calls_the_relay() {
    // Arrange
    let app = spawn_app_with(|c| c.submission.notification = NotificationMode::Watcher).await;

    Mock::given(path("/f/xandgakg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.relay_server)
        .await;

    // Act
    let response = app
        .post_newsletter("email=a%40b.com&accepted_privacy_policy=on".into())
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn relay_only_backend_fails_when_the_relay_rejects_the_submission() {
    // Arrange
    let app = spawn_app_with(|c| c.database.backend = BackendKind::RelayOnly).await;

    Mock::given(path("/f/xandgakg"))
        .respond_with(ResponseTemplate::new(422))
        .expect(1)
        .mount(&app.relay_server)
        .await;

    // Act
    let response = app
        .post_newsletter("email=a%40b.com&accepted_privacy_policy=on".into())
        .await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "failed");
    assert_eq!(
        body["message"],
        "There was an error submitting your request. Please try again."
    );
}

#[tokio::test]
async fn unconfigured_backend_reports_a_failure() {
    // Arrange
    let app = spawn_app_with(|c| {
        c.database.backend = BackendKind::RelayOnly;
        c.email_relay.newsletter_endpoint = String::new();
    })
    .await;

    Mock::given(path("/f/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.relay_server)
        .await;

    // Act
    let response = app
        .post_newsletter("email=a%40b.com&accepted_privacy_policy=on".into())
        .await;

    // Assert
    assert_eq!(500, response.status().as_u16());
}
