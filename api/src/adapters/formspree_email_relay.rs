use crate::domain::email_relay::{EmailRelay, RelayEndpoint, RelayError, RelayFields};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Formspree-style relay: one form id per endpoint, fields posted
/// url-encoded to `<base_url>/f/<form id>`.
#[derive(Debug, Clone)]
pub struct FormspreeEmailRelay {
    http_client: Client,
    base_url: String,
    newsletter_form_id: String,
    contact_form_id: String,
}

impl FormspreeEmailRelay {
    pub fn new(
        base_url: String,
        newsletter_form_id: String,
        contact_form_id: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url,
            newsletter_form_id,
            contact_form_id,
        })
    }

    fn form_id(&self, endpoint: RelayEndpoint) -> &str {
        match endpoint {
            RelayEndpoint::Newsletter => &self.newsletter_form_id,
            RelayEndpoint::Contact => &self.contact_form_id,
        }
    }
}

#[async_trait]
impl EmailRelay for FormspreeEmailRelay {
    #[tracing::instrument(
        name = "Submitting form to email relay",
        skip(self, endpoint, fields),
        fields(relay_endpoint = endpoint.as_str())
    )]
    async fn submit_form(
        &self,
        endpoint: RelayEndpoint,
        fields: &RelayFields,
    ) -> Result<(), RelayError> {
        let url = format!("{}/f/{}", self.base_url, self.form_id(endpoint));

        let response = self
            .http_client
            .post(&url)
            .header("Accept", "application/json")
            .form(fields)
            .send()
            .await
            .map_err(|e| RelayError::Unreachable(e.into()))?;

        response
            .error_for_status()
            .map_err(|e| RelayError::Rejected(e.into()))?;

        Ok(())
    }
}
