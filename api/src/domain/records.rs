use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::contact_request::ContactRequest;
use crate::domain::document_store::Document;
use crate::domain::new_subscriber::NewSubscriber;

/// Document appended to the newsletter collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberRecord {
    pub email: String,
    pub subscribed_at: String,
    pub accepted_privacy_policy: bool,
    /// Tells the out-of-process watcher that a confirmation was already sent.
    pub skip_email_confirmation: bool,
}

impl SubscriberRecord {
    pub fn new(
        subscriber: &NewSubscriber,
        subscribed_at: DateTime<Utc>,
        skip_email_confirmation: bool,
    ) -> Self {
        Self {
            email: subscriber.email.normalized(),
            subscribed_at: subscribed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            accepted_privacy_policy: true,
            skip_email_confirmation,
        }
    }
}

/// Document appended to the contact collection. Duplicates are expected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmissionRecord {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,
    pub service: String,
    pub source_language: String,
    pub target_language: String,
    pub message: String,
    pub submitted_at: String,
    pub skip_email_confirmation: bool,
}

impl ContactSubmissionRecord {
    pub fn new(
        request: &ContactRequest,
        submitted_at: DateTime<Utc>,
        skip_email_confirmation: bool,
    ) -> Self {
        Self {
            name: request.name.inner().to_string(),
            email: request.email.normalized(),
            phone: request.phone.clone(),
            service: request.service.inner().to_string(),
            source_language: request.source_language.inner().to_string(),
            target_language: request.target_language.inner().to_string(),
            message: request.message.inner().to_string(),
            submitted_at: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            skip_email_confirmation,
        }
    }
}

/// Serialise a record into the schemaless shape handed to a document store.
pub fn to_document<T: Serialize>(record: &T) -> Result<Document, serde_json::Error> {
    match serde_json::to_value(record)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(serde::ser::Error::custom(format!(
            "expected a record to serialise to an object, got {}",
            other
        ))),
    }
}
