use crate::coordinator::{Coordinator, SubmissionError};
use crate::domain::{ContactFields, ContactRequest, ValidationError};
use crate::presenter::CONTACT_RECEIVED_MESSAGE;
use crate::routes::{error_body, LeadResponse};
use crate::utils::error_chain_fmt;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error(transparent)]
    ValidationError(#[from] ValidationError),
    #[error(transparent)]
    SubmissionError(#[from] SubmissionError),
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ContactError::SubmissionError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self.to_string())
    }
}

/// Missing fields deserialise as blank so they fail validation, not extraction.
#[derive(serde::Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub source_language: String,
    pub target_language: String,
    pub message: String,
}

impl From<ContactFormData> for ContactFields {
    fn from(value: ContactFormData) -> Self {
        ContactFields {
            name: value.name,
            email: value.email,
            phone: value.phone,
            service: value.service,
            source_language: value.source_language,
            target_language: value.target_language,
            message: value.message,
        }
    }
}

#[tracing::instrument(
    name = "Handling contact request",
    skip(form, coordinator),
    fields(contact_email = %form.email, service = %form.service)
)]
pub async fn submit_contact(
    form: web::Form<ContactFormData>,
    coordinator: web::Data<Coordinator>,
) -> Result<HttpResponse, ContactError> {
    let request = ContactRequest::try_from(ContactFields::from(form.0))?;

    let outcome = coordinator.submit_contact(request).await?;

    Ok(HttpResponse::Ok().json(LeadResponse::accepted(
        "received",
        outcome.id().to_string(),
        CONTACT_RECEIVED_MESSAGE,
    )))
}
