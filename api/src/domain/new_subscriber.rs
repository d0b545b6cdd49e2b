use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::ValidationError;

/// A newsletter sign-up that passed local validation. Consent is part of the
/// type: a `NewSubscriber` cannot exist without it.
#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
}

impl NewSubscriber {
    pub fn parse(email: String, accepted_privacy_policy: bool) -> Result<Self, ValidationError> {
        let email =
            SubscriberEmail::parse(email).map_err(|e| ValidationError::new("email", e))?;

        if !accepted_privacy_policy {
            return Err(ValidationError::new(
                "accepted_privacy_policy",
                "must be accepted before subscribing",
            ));
        }

        Ok(Self { email })
    }
}
