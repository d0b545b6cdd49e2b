use crate::helpers::{spawn_app, spawn_app_with};
use transluga::coordinator::NotificationMode;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

fn jane() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Jane"),
        ("email", "jane@x.com"),
        ("service", "Document Translation"),
        ("sourceLanguage", "English"),
        ("targetLanguage", "Swahili"),
        ("message", "Need 500 words translated"),
    ]
}

fn encode(fields: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(fields).unwrap()
}

#[tokio::test]
async fn contact_request_without_phone_is_received_and_stored() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.post_contact(encode(&jane())).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "received");

    let saved = app.contact_submissions().await;
    assert_eq!(saved.len(), 1);
    assert_eq!(body["id"], saved[0].id.to_string());
    assert_eq!(saved[0].fields["name"], "Jane");
    assert_eq!(saved[0].fields["service"], "Document Translation");
    assert!(saved[0].fields["submittedAt"].is_string());
    assert!(!saved[0].fields.contains_key("phone"));
}

#[tokio::test]
async fn identical_contact_requests_are_both_stored() {
    // Arrange
    let app = spawn_app().await;

    // Act
    app.post_contact(encode(&jane())).await;
    app.post_contact(encode(&jane())).await;

    // Assert
    assert_eq!(app.contact_submissions().await.len(), 2);
}

#[tokio::test]
async fn contact_returns_a_400_when_a_required_field_is_blank() {
    // Arrange
    let app = spawn_app_with(|c| c.submission.notification = NotificationMode::Direct).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.relay_server)
        .await;

    for field in ["name", "email", "service", "sourceLanguage", "targetLanguage", "message"] {
        let fields: Vec<_> = jane()
            .into_iter()
            .map(|(k, v)| if k == field { (k, "") } else { (k, v) })
            .collect();

        // Act
        let response = app.post_contact(encode(&fields)).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when {} was blank.",
            field
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "invalid");
    }
    assert!(app.contact_submissions().await.is_empty());
}

#[tokio::test]
async fn direct_notification_forwards_the_contact_details() {
    // Arrange
    let app = spawn_app_with(|c| c.submission.notification = NotificationMode::Direct).await;

    Mock::given(path("/f/meolbvwe"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.relay_server)
        .await;

    let mut fields = jane();
    fields.push(("phone", "+265 99 000 0000"));

    // Act
    let response = app.post_contact(encode(&fields)).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let requests = app.relay_server.received_requests().await.unwrap();
    let sent: std::collections::HashMap<String, String> =
        serde_urlencoded::from_bytes(&requests[0].body).unwrap();
    assert_eq!(sent["name"], "Jane");
    assert_eq!(sent["phone"], "+265 99 000 0000");
    assert_eq!(sent["sourceLanguage"], "English");
    assert_eq!(sent["_replyto"], "jane@x.com");
}
