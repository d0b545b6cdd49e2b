use crate::domain::required_field::{RequiredField, MESSAGE_MAX_GRAPHEMES};
use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::ValidationError;

/// A contact / quote request that passed local validation.
#[derive(Debug, Clone)]
pub struct ContactRequest {
    pub name: RequiredField,
    pub email: SubscriberEmail,
    pub phone: Option<String>,
    pub service: RequiredField,
    pub source_language: RequiredField,
    pub target_language: RequiredField,
    pub message: RequiredField,
}

/// Raw contact form fields, as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub source_language: String,
    pub target_language: String,
    pub message: String,
}

impl TryFrom<ContactFields> for ContactRequest {
    type Error = ValidationError;

    fn try_from(value: ContactFields) -> Result<Self, Self::Error> {
        let name = RequiredField::parse("name", value.name)?;
        let email = SubscriberEmail::parse(value.email)
            .map_err(|e| ValidationError::new("email", e))?;
        let service = RequiredField::parse("service", value.service)?;
        let source_language = RequiredField::parse("sourceLanguage", value.source_language)?;
        let target_language = RequiredField::parse("targetLanguage", value.target_language)?;
        let message =
            RequiredField::parse_with_limit("message", value.message, MESSAGE_MAX_GRAPHEMES)?;

        let phone = Some(value.phone.trim().to_string()).filter(|p| !p.is_empty());

        Ok(ContactRequest {
            name,
            email,
            phone,
            service,
            source_language,
            target_language,
            message,
        })
    }
}
