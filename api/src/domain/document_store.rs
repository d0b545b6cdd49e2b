use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::utils::error_chain_fmt;

/// Schemaless record as handed to, and returned from, a document store.
pub type Document = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: RecordId,
    pub fields: Document,
}

#[derive(Debug, Clone)]
pub struct EqualityFilter {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

#[derive(Debug, Clone)]
pub struct Query {
    pub filter: EqualityFilter,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn field_equals(field: &str, value: &str) -> Self {
        Self {
            filter: EqualityFilter {
                field: field.to_string(),
                value: value.to_string(),
            },
            order_by: None,
            limit: None,
        }
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, document: &Document) -> bool {
        matches!(document.get(&self.filter.field), Some(Value::String(v)) if *v == self.filter.value)
    }

    /// Applies ordering and limit to an already filtered result set.
    pub fn finish(&self, mut records: Vec<StoredDocument>) -> QueryResult {
        if let Some(order_by) = &self.order_by {
            records.sort_by(|a, b| {
                let ordering =
                    compare_values(a.fields.get(&order_by.field), b.fields.get(&order_by.field));
                match order_by.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = self.limit {
            records.truncate(limit);
        }
        QueryResult { records }
    }
}

// Missing values sort first; RFC 3339 timestamps compare correctly as strings.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub records: Vec<StoredDocument>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(thiserror::Error)]
pub enum DocumentStoreError {
    #[error("store unavailable")]
    Unavailable(#[source] anyhow::Error),
    #[error("insert rejected")]
    Rejected(#[source] anyhow::Error),
}

impl std::fmt::Debug for DocumentStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// The hosted collection database. Only append and equality lookups are used.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<RecordId, DocumentStoreError>;

    async fn query(&self, collection: &str, query: Query)
        -> Result<QueryResult, DocumentStoreError>;
}
