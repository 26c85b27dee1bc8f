//! Common test utilities and fixtures for the sales metrics tests
//!
//! Provides a temporary sled-backed store session and helpers for writing
//! CSV fixture files.

#![allow(dead_code)]

use sales_metrics::db_operations::{Collection, DocumentStore, Filter, SledStore, StoreSession, UpsertOutcome};
use sales_metrics::{SalesError, SalesResult};
use serde_json::Value;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const HEADER: &str = "Order ID,Product ID,Customer ID,Product Name,Category,Region,Date of Sale,Quantity Sold,Unit Price,Discount,Shipping Cost,Payment Method,Customer Name,Customer Email,Customer Address";

/// The two-order scenario: one product bought by two customers.
pub const SCENARIO_ROWS: &[&str] = &[
    "O1,P1,C1,Widget,Toys,West,2021-05-01,2,10.0,0.1,5.0,Credit Card,Ann,ann@example.com,1 Main St",
    "O2,P1,C2,Widget,Toys,East,2021-06-01,3,10.0,0.0,2.5,PayPal,Bob,bob@example.com,2 Side St",
];

/// Temporary store plus a scratch directory for CSV files
pub struct TestFixture {
    pub session: StoreSession,
    pub temp_dir: TempDir,
}

fn create_temp_store() -> SledStore {
    let db = sled::Config::new()
        .temporary(true)
        .open()
        .expect("Failed to open temporary database");
    SledStore::new(db).expect("Failed to create store")
}

impl TestFixture {
    pub fn new() -> Self {
        Self::with_store(Arc::new(create_temp_store()))
    }

    /// Fixture whose store rejects the first write of each listed
    /// `(collection, natural key)` pair.
    pub fn with_failing_writes(failures: &[(Collection, &str)]) -> Self {
        Self::with_store(Arc::new(FailingStore::new(create_temp_store(), failures)))
    }

    fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        Self {
            session: StoreSession::new(store),
            temp_dir,
        }
    }

    /// Write a CSV file with the standard header followed by `rows`.
    pub fn write_csv(&self, name: &str, rows: &[&str]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut contents = String::from(HEADER);
        for row in rows {
            contents.push('\n');
            contents.push_str(row);
        }
        contents.push('\n');
        std::fs::write(&path, contents).expect("Failed to write CSV fixture");
        path
    }

    pub fn scenario_csv(&self) -> PathBuf {
        self.write_csv("sales.csv", SCENARIO_ROWS)
    }
}

/// Build a row with the given order, product and sale details. Customer
/// columns are derived from `customer_id`.
pub fn sales_row(
    order_id: &str,
    product_id: &str,
    customer_id: &str,
    product_name: &str,
    category: &str,
    region: &str,
    date: &str,
    quantity: &str,
    unit_price: &str,
) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},0.0,0.0,Cash,Customer {},{}@example.com,{} Road",
        order_id,
        product_id,
        customer_id,
        product_name,
        category,
        region,
        date,
        quantity,
        unit_price,
        customer_id,
        customer_id,
        customer_id
    )
}

/// Store that fails chosen writes once and delegates everything else to a
/// temporary sled store.
pub struct FailingStore {
    inner: SledStore,
    pending: Mutex<HashSet<(Collection, String)>>,
}

impl FailingStore {
    pub fn new(inner: SledStore, failures: &[(Collection, &str)]) -> Self {
        let pending = failures
            .iter()
            .map(|(collection, key)| (*collection, key.to_string()))
            .collect();
        Self {
            inner,
            pending: Mutex::new(pending),
        }
    }

    fn check(&self, collection: Collection, document: &Value) -> SalesResult<()> {
        let key = document
            .get(collection.natural_key())
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let mut pending = self.pending.lock().expect("failure set poisoned");
        if pending.remove(&(collection, key.clone())) {
            return Err(SalesError::Database(format!("write of {} {} rejected", collection, key)));
        }
        Ok(())
    }
}

impl DocumentStore for FailingStore {
    fn insert_one(&self, collection: Collection, document: Value) -> SalesResult<String> {
        self.check(collection, &document)?;
        self.inner.insert_one(collection, document)
    }

    fn upsert_one(&self, collection: Collection, document: Value) -> SalesResult<UpsertOutcome> {
        self.check(collection, &document)?;
        self.inner.upsert_one(collection, document)
    }

    fn find(&self, collection: Collection, filter: &Filter) -> SalesResult<Vec<Value>> {
        self.inner.find(collection, filter)
    }

    fn flush(&self) -> SalesResult<()> {
        self.inner.flush()
    }
}
