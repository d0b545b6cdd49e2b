use super::{LeadForm, CONTACT_RECEIVED_MESSAGE};
use crate::coordinator::{Coordinator, SubmissionError, SubmissionOutcome};
use crate::domain::{ContactFields, ContactRequest, ValidationError};
use async_trait::async_trait;

/// The contact form's draft is exactly its raw fields.
pub type ContactForm = ContactFields;

#[async_trait]
impl LeadForm for ContactForm {
    type Payload = ContactRequest;

    fn validate(&self) -> Result<ContactRequest, ValidationError> {
        self.clone().try_into()
    }

    async fn dispatch(
        coordinator: &Coordinator,
        payload: ContactRequest,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        coordinator.submit_contact(payload).await
    }

    fn success_message(_outcome: &SubmissionOutcome) -> &'static str {
        CONTACT_RECEIVED_MESSAGE
    }
}
