mod availability;

pub use availability::{check_availability, Availability};

use crate::adapters::in_memory_document_store::InMemoryDocumentStore;
use crate::domain::autoresponse::{
    contact_autoresponse, newsletter_autoresponse, Branding, CONTACT_SUBJECT, NEWSLETTER_SUBJECT,
};
use crate::domain::document_store::{Direction, Query};
use crate::domain::records::{to_document, ContactSubmissionRecord, SubscriberRecord};
use crate::domain::{
    ContactRequest, DocumentStore, DocumentStoreError, EmailRelay, NewSubscriber, RecordId,
    RelayEndpoint, RelayError, RelayFields,
};
use crate::utils::error_chain_fmt;
use anyhow::anyhow;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

/// Where submissions are persisted.
pub enum Backend {
    DocumentStore(Arc<dyn DocumentStore>),
    /// The relay submission itself is the record of the lead.
    RelayOnly,
    Mock(Arc<InMemoryDocumentStore>),
}

impl Backend {
    fn store(&self) -> Option<&dyn DocumentStore> {
        match self {
            Backend::DocumentStore(store) => Some(&**store),
            Backend::Mock(store) => Some(&**store),
            Backend::RelayOnly => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Backend::DocumentStore(_) => "document_store",
            Backend::RelayOnly => "relay_only",
            Backend::Mock(_) => "mock",
        }
    }
}

/// Who sends the confirmation emails for a persisted lead.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationMode {
    /// The coordinator submits the lead to the relay right after persisting it.
    Direct,
    /// An out-of-process watcher reacts to new records; the coordinator only persists.
    Watcher,
}

impl NotificationMode {
    fn skip_email_confirmation(&self) -> bool {
        matches!(self, NotificationMode::Direct)
    }
}

#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    pub duplicate_check: bool,
    pub notification: NotificationMode,
    pub admin_email: Option<String>,
    pub newsletter_collection: String,
    pub contact_collection: String,
    pub branding: Branding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Created { id: RecordId },
    AlreadySubscribed { id: RecordId },
}

impl SubmissionOutcome {
    pub fn id(&self) -> &RecordId {
        match self {
            SubmissionOutcome::Created { id } | SubmissionOutcome::AlreadySubscribed { id } => id,
        }
    }
}

#[derive(thiserror::Error)]
pub enum SubmissionError {
    #[error("store unavailable")]
    StoreUnavailable(#[source] anyhow::Error),
    #[error("insert rejected")]
    InsertRejected(#[source] anyhow::Error),
}

impl std::fmt::Debug for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<DocumentStoreError> for SubmissionError {
    fn from(e: DocumentStoreError) -> Self {
        match e {
            DocumentStoreError::Unavailable(_) => SubmissionError::StoreUnavailable(e.into()),
            DocumentStoreError::Rejected(_) => SubmissionError::InsertRejected(e.into()),
        }
    }
}

impl From<RelayError> for SubmissionError {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::Unreachable(_) => SubmissionError::StoreUnavailable(e.into()),
            RelayError::Rejected(_) => SubmissionError::InsertRejected(e.into()),
        }
    }
}

/// Persists leads and, depending on the notification mode, asks the relay to
/// email the operator and the submitter. Only persistence can fail a submission.
pub struct Coordinator {
    backend: Backend,
    availability: Availability,
    relay: Arc<dyn EmailRelay>,
    options: CoordinatorOptions,
}

impl Coordinator {
    pub fn new(
        backend: Backend,
        availability: Availability,
        relay: Arc<dyn EmailRelay>,
        options: CoordinatorOptions,
    ) -> Self {
        Self {
            backend,
            availability,
            relay,
            options,
        }
    }

    #[tracing::instrument(
        name = "Adding a new subscriber",
        skip(self, subscriber),
        fields(
            backend = self.backend.name(),
            subscriber_email = %subscriber.email,
        )
    )]
    pub async fn subscribe(
        &self,
        subscriber: NewSubscriber,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.ensure_available()?;
        let fields = self.newsletter_fields(&subscriber);

        let Some(store) = self.backend.store() else {
            return self.submit_to_relay(RelayEndpoint::Newsletter, &fields).await;
        };

        if self.options.duplicate_check {
            if let Some(id) = self.find_subscriber(store, &subscriber).await {
                return Ok(SubmissionOutcome::AlreadySubscribed { id });
            }
        }

        let record = SubscriberRecord::new(
            &subscriber,
            Utc::now(),
            self.options.notification.skip_email_confirmation(),
        );
        let document =
            to_document(&record).map_err(|e| SubmissionError::InsertRejected(e.into()))?;
        let id = store
            .insert(&self.options.newsletter_collection, document)
            .await?;

        self.notify(RelayEndpoint::Newsletter, &fields).await;

        Ok(SubmissionOutcome::Created { id })
    }

    #[tracing::instrument(
        name = "Recording a contact request",
        skip(self, request),
        fields(
            backend = self.backend.name(),
            contact_email = %request.email,
            service = %request.service.inner(),
        )
    )]
    pub async fn submit_contact(
        &self,
        request: ContactRequest,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.ensure_available()?;
        let fields = self.contact_fields(&request);

        let Some(store) = self.backend.store() else {
            return self.submit_to_relay(RelayEndpoint::Contact, &fields).await;
        };

        let record = ContactSubmissionRecord::new(
            &request,
            Utc::now(),
            self.options.notification.skip_email_confirmation(),
        );
        let document =
            to_document(&record).map_err(|e| SubmissionError::InsertRejected(e.into()))?;
        let id = store
            .insert(&self.options.contact_collection, document)
            .await?;

        self.notify(RelayEndpoint::Contact, &fields).await;

        Ok(SubmissionOutcome::Created { id })
    }

    fn ensure_available(&self) -> Result<(), SubmissionError> {
        match &self.availability {
            Availability::Available => Ok(()),
            Availability::Unavailable(reason) => {
                tracing::error!(reason = %reason, "Submission backend is not configured");
                Err(SubmissionError::StoreUnavailable(anyhow!(reason.clone())))
            }
        }
    }

    /// Best-effort lookup. A failed query is logged and treated as "not found"
    /// so that the insert still goes ahead.
    #[tracing::instrument(name = "Checking for an existing subscriber", skip(self, store, subscriber))]
    async fn find_subscriber(
        &self,
        store: &dyn DocumentStore,
        subscriber: &NewSubscriber,
    ) -> Option<RecordId> {
        let query = Query::field_equals("email", &subscriber.email.normalized())
            .order_by("subscribedAt", Direction::Descending)
            .limit(1);

        match store
            .query(&self.options.newsletter_collection, query)
            .await
        {
            Ok(result) => result.records.into_iter().next().map(|r| r.id),
            Err(e) => {
                tracing::warn!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Duplicate check failed, continuing with insert"
                );
                None
            }
        }
    }

    async fn submit_to_relay(
        &self,
        endpoint: RelayEndpoint,
        fields: &RelayFields,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.relay.submit_form(endpoint, fields).await?;

        Ok(SubmissionOutcome::Created {
            id: RecordId::generate(),
        })
    }

    /// Never fails the submission: the lead is already persisted.
    #[tracing::instrument(name = "Sending lead notification", skip(self, fields))]
    async fn notify(&self, endpoint: RelayEndpoint, fields: &RelayFields) {
        if self.options.notification != NotificationMode::Direct {
            return;
        }

        if let Err(e) = self.relay.submit_form(endpoint, fields).await {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Failed to send lead notification"
            );
        }
    }

    fn newsletter_fields(&self, subscriber: &NewSubscriber) -> RelayFields {
        let branding = &self.options.branding;

        RelayFields {
            email: subscriber.email.inner().to_string(),
            message: format!("New subscriber: {}", subscriber.email),
            subject: Some(NEWSLETTER_SUBJECT.to_string()),
            reply_to: Some(subscriber.email.inner().to_string()),
            cc: self.options.admin_email.clone(),
            autoresponse: Some(newsletter_autoresponse(branding)),
            website: Some(branding.website_url.clone()),
            ..Default::default()
        }
    }

    fn contact_fields(&self, request: &ContactRequest) -> RelayFields {
        let branding = &self.options.branding;

        RelayFields {
            email: request.email.inner().to_string(),
            name: Some(request.name.inner().to_string()),
            message: request.message.inner().to_string(),
            phone: request.phone.clone(),
            service: Some(request.service.inner().to_string()),
            source_language: Some(request.source_language.inner().to_string()),
            target_language: Some(request.target_language.inner().to_string()),
            subject: Some(CONTACT_SUBJECT.to_string()),
            reply_to: Some(request.email.inner().to_string()),
            cc: self.options.admin_email.clone(),
            autoresponse: Some(contact_autoresponse(branding, request.name.inner())),
            website: Some(branding.website_url.clone()),
        }
    }
}
