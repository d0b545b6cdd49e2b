pub mod dynamodb_document_store;
pub mod formspree_email_relay;
pub mod in_memory_document_store;
