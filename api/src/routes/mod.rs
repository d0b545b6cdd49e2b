mod contact;
mod health_check;
mod newsletter;

pub use contact::*;
pub use health_check::*;
pub use newsletter::*;

use crate::presenter::FAILURE_MESSAGE;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

/// JSON body returned by both lead endpoints.
#[derive(Serialize)]
pub struct LeadResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub message: String,
}

impl LeadResponse {
    pub fn accepted(status: &'static str, id: String, message: &str) -> Self {
        Self {
            status,
            id: Some(id),
            message: message.to_string(),
        }
    }

    fn invalid(message: String) -> Self {
        Self {
            status: "invalid",
            id: None,
            message,
        }
    }

    fn failed() -> Self {
        Self {
            status: "failed",
            id: None,
            message: FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Validation problems echo the reason; anything else gets the generic retry prompt.
fn error_body(status_code: StatusCode, reason: String) -> HttpResponse {
    let body = if status_code == StatusCode::BAD_REQUEST {
        LeadResponse::invalid(reason)
    } else {
        LeadResponse::failed()
    };
    HttpResponse::build(status_code).json(body)
}
