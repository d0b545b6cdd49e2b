use crate::domain::document_store::{
    Document, DocumentStore, DocumentStoreError, Query, QueryResult, RecordId, StoredDocument,
};
use anyhow::anyhow;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;
use telemetry::get_trace_and_span_id;

const PARTITION_KEY: &str = "PK";
const COLLECTION: &str = "Collection";
const ID: &str = "Id";
const TRACE_PARENT: &str = "TraceParent";
const PARENT_SPAN: &str = "ParentSpan";

/// Single-table layout: every collection lives in one table, partitioned by
/// `<collection>#<id>` and tagged with a `Collection` attribute.
#[derive(Debug, Clone)]
pub struct DynamoDbDocumentStore {
    client: Client,
    table_name: String,
}

impl DynamoDbDocumentStore {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
impl DocumentStore for DynamoDbDocumentStore {
    #[tracing::instrument(name = "dynamodb_insert", skip(self, document), fields(table = %self.table_name))]
    async fn insert(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<RecordId, DocumentStoreError> {
        let id = RecordId::generate();

        let mut item: HashMap<String, AttributeValue> = serde_dynamo::to_item(&document)
            .map_err(|e| DocumentStoreError::Rejected(e.into()))?;

        item.insert(
            PARTITION_KEY.to_string(),
            AttributeValue::S(format!("{}#{}", collection, id)),
        );
        item.insert(COLLECTION.to_string(), AttributeValue::S(collection.to_string()));
        item.insert(ID.to_string(), AttributeValue::S(id.to_string()));

        if let Some((trace_id, span_id)) = get_trace_and_span_id() {
            item.insert(TRACE_PARENT.to_string(), AttributeValue::S(trace_id));
            item.insert(PARENT_SPAN.to_string(), AttributeValue::S(span_id));
        }

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(PK)")
            .send()
            .await
            .map_err(|e| {
                classify(
                    e,
                    format!(
                        "Failure inserting record to DynamoDB. Using table {}",
                        &self.table_name
                    ),
                )
            })?;

        Ok(id)
    }

    #[tracing::instrument(name = "dynamodb_query", skip(self, query), fields(table = %self.table_name))]
    async fn query(
        &self,
        collection: &str,
        query: Query,
    ) -> Result<QueryResult, DocumentStoreError> {
        let mut records = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression("#collection = :collection AND #field = :value")
                .expression_attribute_names("#collection", COLLECTION)
                .expression_attribute_names("#field", &query.filter.field)
                .expression_attribute_values(
                    ":collection",
                    AttributeValue::S(collection.to_string()),
                )
                .expression_attribute_values(
                    ":value",
                    AttributeValue::S(query.filter.value.clone()),
                )
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|e| {
                    classify(
                        e,
                        format!("Failure querying DynamoDB. Using table {}", &self.table_name),
                    )
                })?;

            for item in output.items.unwrap_or_default() {
                records.push(into_stored_document(item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(query.finish(records))
    }
}

/// Service errors mean DynamoDB answered and said no; everything else
/// (dispatch, timeout, construction) means it could not be reached.
fn classify<E, R>(error: SdkError<E, R>, context: String) -> DocumentStoreError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let rejected = matches!(error, SdkError::ServiceError(_));
    let error = anyhow::Error::new(error).context(context);

    if rejected {
        DocumentStoreError::Rejected(error)
    } else {
        DocumentStoreError::Unavailable(error)
    }
}

fn into_stored_document(
    item: HashMap<String, AttributeValue>,
) -> Result<StoredDocument, DocumentStoreError> {
    let value: serde_json::Value =
        serde_dynamo::from_item(item).map_err(|e| DocumentStoreError::Rejected(e.into()))?;

    let serde_json::Value::Object(mut fields) = value else {
        return Err(DocumentStoreError::Rejected(anyhow!(
            "DynamoDB item did not decode to an object"
        )));
    };

    let id = match fields.remove(ID) {
        Some(serde_json::Value::String(id)) => RecordId::new(id),
        _ => {
            return Err(DocumentStoreError::Rejected(anyhow!(
                "DynamoDB item is missing its {} attribute",
                ID
            )))
        }
    };

    for key in [PARTITION_KEY, COLLECTION, TRACE_PARENT, PARENT_SPAN] {
        fields.remove(key);
    }

    Ok(StoredDocument { id, fields })
}
