use crate::domain::document_store::{
    Document, DocumentStore, DocumentStoreError, Query, QueryResult, RecordId, StoredDocument,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local document store. Backs the `mock` backend, so the site can
/// run without any hosted database, and doubles as a test fake.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything appended to `collection`, in insertion order.
    pub async fn documents(&self, collection: &str) -> Vec<StoredDocument> {
        self.collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    #[tracing::instrument(name = "in_memory_insert", skip(self, document))]
    async fn insert(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<RecordId, DocumentStoreError> {
        let id = RecordId::new(format!("mock-{}", uuid::Uuid::new_v4()));

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                fields: document,
            });

        Ok(id)
    }

    #[tracing::instrument(name = "in_memory_query", skip(self, query))]
    async fn query(
        &self,
        collection: &str,
        query: Query,
    ) -> Result<QueryResult, DocumentStoreError> {
        let records = self
            .collections
            .read()
            .await
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|d| query.matches(&d.fields))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(query.finish(records))
    }
}
