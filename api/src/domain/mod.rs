pub mod autoresponse;
pub mod contact_request;
pub mod document_store;
pub mod email_relay;
pub mod new_subscriber;
pub mod records;
pub mod required_field;
pub mod subscriber_email;
mod validation_error;

pub use crate::domain::contact_request::{ContactFields, ContactRequest};
pub use crate::domain::document_store::{DocumentStore, DocumentStoreError, RecordId};
pub use crate::domain::email_relay::{EmailRelay, RelayEndpoint, RelayError, RelayFields};
pub use crate::domain::new_subscriber::NewSubscriber;
pub use crate::domain::validation_error::ValidationError;
