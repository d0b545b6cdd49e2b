use crate::coordinator::{Coordinator, SubmissionError, SubmissionOutcome};
use crate::domain::{NewSubscriber, ValidationError};
use crate::presenter::{ALREADY_SUBSCRIBED_MESSAGE, SUBSCRIBED_MESSAGE};
use crate::routes::{error_body, LeadResponse};
use crate::utils::error_chain_fmt;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error(transparent)]
    ValidationError(#[from] ValidationError),
    #[error(transparent)]
    SubmissionError(#[from] SubmissionError),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscribeError::SubmissionError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self.to_string())
    }
}

#[derive(serde::Deserialize)]
pub struct FormData {
    #[serde(default)]
    pub email: String,
    /// Checkbox value; browsers send `on` when ticked and omit it otherwise.
    #[serde(default)]
    pub accepted_privacy_policy: Option<String>,
}

impl TryFrom<FormData> for NewSubscriber {
    type Error = ValidationError;

    fn try_from(value: FormData) -> Result<Self, Self::Error> {
        let accepted = is_checked(value.accepted_privacy_policy.as_deref());
        NewSubscriber::parse(value.email, accepted)
    }
}

fn is_checked(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_lowercase()).as_deref(),
        Some("on" | "true" | "1" | "yes")
    )
}

#[tracing::instrument(
    name = "Handling newsletter sign-up",
    skip(form, coordinator),
    fields(subscriber_email = %form.email)
)]
pub async fn subscribe(
    form: web::Form<FormData>,
    coordinator: web::Data<Coordinator>,
) -> Result<HttpResponse, SubscribeError> {
    let new_subscriber: NewSubscriber = form.0.try_into()?;

    let outcome = coordinator.subscribe(new_subscriber).await?;

    let body = match &outcome {
        SubmissionOutcome::Created { id } => {
            LeadResponse::accepted("subscribed", id.to_string(), SUBSCRIBED_MESSAGE)
        }
        SubmissionOutcome::AlreadySubscribed { id } => LeadResponse::accepted(
            "already_subscribed",
            id.to_string(),
            ALREADY_SUBSCRIBED_MESSAGE,
        ),
    };

    Ok(HttpResponse::Ok().json(body))
}
