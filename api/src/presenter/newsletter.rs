use super::{LeadForm, ALREADY_SUBSCRIBED_MESSAGE, SUBSCRIBED_MESSAGE};
use crate::coordinator::{Coordinator, SubmissionError, SubmissionOutcome};
use crate::domain::{NewSubscriber, ValidationError};
use async_trait::async_trait;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsletterForm {
    pub email: String,
    pub accepted_privacy_policy: bool,
}

#[async_trait]
impl LeadForm for NewsletterForm {
    type Payload = NewSubscriber;

    fn is_ready(&self) -> bool {
        self.accepted_privacy_policy
    }

    fn validate(&self) -> Result<NewSubscriber, ValidationError> {
        NewSubscriber::parse(self.email.clone(), self.accepted_privacy_policy)
    }

    async fn dispatch(
        coordinator: &Coordinator,
        payload: NewSubscriber,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        coordinator.subscribe(payload).await
    }

    fn success_message(outcome: &SubmissionOutcome) -> &'static str {
        match outcome {
            SubmissionOutcome::Created { .. } => SUBSCRIBED_MESSAGE,
            SubmissionOutcome::AlreadySubscribed { .. } => ALREADY_SUBSCRIBED_MESSAGE,
        }
    }
}
