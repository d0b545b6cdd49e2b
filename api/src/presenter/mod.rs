//! Client-side state machine for the lead forms.
//!
//! A presenter owns one form instance: its draft, its inline validation
//! error and the status of the current submission attempt.
//!
//! ```text
//! Idle -> Submitting -> Success | Failed -> Idle
//! ```
//!
//! Terminal statuses revert to `Idle` once the display window has elapsed
//! (see [`FormPresenter::tick`]) or on the next edit.
mod contact;
mod newsletter;

pub use contact::ContactForm;
pub use newsletter::NewsletterForm;

use crate::coordinator::{Coordinator, SubmissionError, SubmissionOutcome};
use crate::domain::ValidationError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const SUBSCRIBED_MESSAGE: &str =
    "Thank you for subscribing! Please check your email to confirm your subscription.";
pub const ALREADY_SUBSCRIBED_MESSAGE: &str = "You're already subscribed to our newsletter.";
pub const CONTACT_RECEIVED_MESSAGE: &str =
    "Thank you! Your message has been received. We will contact you shortly.";
pub const FAILURE_MESSAGE: &str = "There was an error submitting your request. Please try again.";

pub const DEFAULT_DISPLAY_WINDOW: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Submitting,
    Success { message: String },
    Failed { message: String },
}

impl FormStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FormStatus::Success { .. } | FormStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// Local validation failed; nothing was sent.
    Invalid(ValidationError),
    /// A submission from this form is already in flight.
    Ignored,
    Finished(FormStatus),
}

/// A form whose validated payload can be handed to the coordinator.
#[async_trait]
pub trait LeadForm: Clone + Default + PartialEq + Send + Sync + 'static {
    type Payload: Send;

    /// Extra gate on the submit control, e.g. a consent checkbox.
    fn is_ready(&self) -> bool {
        true
    }

    fn validate(&self) -> Result<Self::Payload, ValidationError>;

    async fn dispatch(
        coordinator: &Coordinator,
        payload: Self::Payload,
    ) -> Result<SubmissionOutcome, SubmissionError>;

    fn success_message(outcome: &SubmissionOutcome) -> &'static str;
}

struct PresenterState<F> {
    draft: F,
    status: FormStatus,
    settled_at: Option<Instant>,
    error: Option<ValidationError>,
}

pub struct FormPresenter<F: LeadForm> {
    coordinator: Arc<Coordinator>,
    display_window: Duration,
    state: Mutex<PresenterState<F>>,
}

impl<F: LeadForm> FormPresenter<F> {
    pub fn new(coordinator: Arc<Coordinator>) -> Self {
        Self::with_display_window(coordinator, DEFAULT_DISPLAY_WINDOW)
    }

    pub fn with_display_window(coordinator: Arc<Coordinator>, display_window: Duration) -> Self {
        Self {
            coordinator,
            display_window,
            state: Mutex::new(PresenterState {
                draft: F::default(),
                status: FormStatus::Idle,
                settled_at: None,
                error: None,
            }),
        }
    }

    pub async fn status(&self) -> FormStatus {
        self.state.lock().await.status.clone()
    }

    pub async fn draft(&self) -> F {
        self.state.lock().await.draft.clone()
    }

    pub async fn inline_error(&self) -> Option<ValidationError> {
        self.state.lock().await.error.clone()
    }

    /// Any edit dismisses a displayed result.
    pub async fn edit(&self, change: impl FnOnce(&mut F)) {
        let mut state = self.state.lock().await;
        change(&mut state.draft);
        state.error = None;
        if state.status.is_terminal() {
            state.status = FormStatus::Idle;
            state.settled_at = None;
        }
    }

    pub async fn can_submit(&self) -> bool {
        let state = self.state.lock().await;
        state.status != FormStatus::Submitting && state.draft.is_ready()
    }

    /// A successful submission clears the draft, unless it was edited while
    /// the submission was in flight.
    #[tracing::instrument(name = "Submitting lead form", skip(self))]
    pub async fn submit(&self) -> SubmitAttempt {
        let (payload, submitted) = {
            let mut state = self.state.lock().await;
            if state.status == FormStatus::Submitting {
                return SubmitAttempt::Ignored;
            }

            match state.draft.validate() {
                Ok(payload) => {
                    state.status = FormStatus::Submitting;
                    state.settled_at = None;
                    state.error = None;
                    (payload, state.draft.clone())
                }
                Err(e) => {
                    state.status = FormStatus::Idle;
                    state.settled_at = None;
                    state.error = Some(e.clone());
                    return SubmitAttempt::Invalid(e);
                }
            }
        };

        // The lock is released here so edits stay possible while in flight.
        let status = match F::dispatch(&self.coordinator, payload).await {
            Ok(outcome) => FormStatus::Success {
                message: F::success_message(&outcome).to_string(),
            },
            Err(e) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Lead submission failed"
                );
                FormStatus::Failed {
                    message: FAILURE_MESSAGE.to_string(),
                }
            }
        };

        let mut state = self.state.lock().await;
        if matches!(status, FormStatus::Success { .. }) && state.draft == submitted {
            state.draft = F::default();
        }
        state.status = status.clone();
        state.settled_at = Some(Instant::now());

        SubmitAttempt::Finished(status)
    }

    /// Reverts a terminal status once it has been shown for the display window.
    pub async fn tick(&self, now: Instant) -> FormStatus {
        let mut state = self.state.lock().await;
        let expired = state
            .settled_at
            .map(|settled_at| now.saturating_duration_since(settled_at) >= self.display_window)
            .unwrap_or(false);

        if expired && state.status.is_terminal() {
            state.status = FormStatus::Idle;
            state.settled_at = None;
        }

        state.status.clone()
    }
}
