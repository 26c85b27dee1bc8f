use super::filter::Filter;
use super::pipeline::{run_stages, Pipeline};
use crate::error::SalesResult;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// The three collections of the sales database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Orders,
    Products,
    Customers,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Orders => "orders",
            Collection::Products => "products",
            Collection::Customers => "customers",
        }
    }

    /// Field holding the external business identifier of a document.
    pub fn natural_key(self) -> &'static str {
        match self {
            Collection::Orders => "order_id",
            Collection::Products => "product_id",
            Collection::Customers => "customer_id",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Blocking document-store operations the service relies on.
///
/// Documents are JSON objects. Every stored document carries an internal
/// `_id` assigned by the store, distinct from the collection's natural key.
/// Implementations must be shareable across request handlers.
pub trait DocumentStore: Send + Sync {
    /// Insert a new document unconditionally and return its internal id.
    fn insert_one(&self, collection: Collection, document: Value) -> SalesResult<String>;

    /// Overwrite the fields of the document whose natural key matches the
    /// one in `document`, inserting it when no such document exists.
    fn upsert_one(&self, collection: Collection, document: Value) -> SalesResult<UpsertOutcome>;

    /// All documents matching the filter, in store order.
    fn find(&self, collection: Collection, filter: &Filter) -> SalesResult<Vec<Value>>;

    fn count(&self, collection: Collection, filter: &Filter) -> SalesResult<u64> {
        Ok(self.find(collection, filter)?.len() as u64)
    }

    /// Distinct values of `field` among matching documents. Documents
    /// lacking the field contribute nothing.
    fn distinct(&self, collection: Collection, field: &str, filter: &Filter) -> SalesResult<Vec<Value>> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for document in self.find(collection, filter)? {
            if let Some(value) = document.get(field) {
                if seen.insert(value.to_string()) {
                    values.push(value.clone());
                }
            }
        }
        Ok(values)
    }

    /// Run an aggregation pipeline over the collection.
    fn aggregate(&self, collection: Collection, pipeline: &Pipeline) -> SalesResult<Vec<Value>> {
        let (filter, rest) = pipeline.split_leading_match();
        let documents = self.find(collection, &filter)?;
        Ok(run_stages(rest, documents))
    }

    /// Make prior writes durable.
    fn flush(&self) -> SalesResult<()> {
        Ok(())
    }
}
