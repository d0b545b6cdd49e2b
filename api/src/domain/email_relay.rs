use async_trait::async_trait;
use serde::Serialize;

use crate::utils::error_chain_fmt;

/// The relay exposes one logical endpoint per form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayEndpoint {
    Newsletter,
    Contact,
}

impl RelayEndpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayEndpoint::Newsletter => "newsletter",
            RelayEndpoint::Contact => "contact",
        }
    }
}

/// Fields of one relay submission. Underscore-prefixed names are relay
/// directives rather than lead data.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RelayFields {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(rename = "sourceLanguage", skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(rename = "targetLanguage", skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
    #[serde(rename = "_subject", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "_replyto", skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(rename = "_cc", skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(rename = "_autoresponse", skip_serializing_if = "Option::is_none")]
    pub autoresponse: Option<String>,
    #[serde(rename = "_website", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(thiserror::Error)]
pub enum RelayError {
    #[error("the email relay could not be reached")]
    Unreachable(#[source] anyhow::Error),
    #[error("the email relay rejected the submission")]
    Rejected(#[source] anyhow::Error),
}

impl std::fmt::Debug for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Third-party form relay: accepts form fields, forwards them to the site
/// operator and optionally autoresponds to the submitter.
#[async_trait]
pub trait EmailRelay: Send + Sync {
    async fn submit_form(
        &self,
        endpoint: RelayEndpoint,
        fields: &RelayFields,
    ) -> Result<(), RelayError>;
}
