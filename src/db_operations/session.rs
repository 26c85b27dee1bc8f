use super::core::{Collection, DocumentStore, UpsertOutcome};
use super::sled_store::SledStore;
use crate::constants::DEFAULT_STORE_TIMEOUT_SECS;
use crate::error::{SalesError, SalesResult};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

/// The single long-lived store session shared by ingestion and metrics.
///
/// Cloning is cheap; every clone talks to the same store. Operations run
/// on the blocking pool and fail with [`SalesError::Timeout`] once the
/// per-operation timeout elapses. The blocking call itself is not
/// cancelled and no retry is attempted.
#[derive(Clone)]
pub struct StoreSession {
    store: Arc<dyn DocumentStore>,
    op_timeout: Duration,
}

impl StoreSession {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            op_timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
        }
    }

    /// Open a sled-backed session from a connection string.
    pub fn connect(uri: &str) -> SalesResult<Self> {
        Ok(Self::new(Arc::new(SledStore::connect(uri)?)))
    }

    pub fn with_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.op_timeout
    }

    /// Run one blocking store operation under the session timeout.
    pub async fn run<T, F>(&self, operation: &'static str, f: F) -> SalesResult<T>
    where
        F: FnOnce(&dyn DocumentStore) -> SalesResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let handle = task::spawn_blocking(move || f(store.as_ref()));
        match tokio::time::timeout(self.op_timeout, handle).await {
            Ok(joined) => joined.map_err(|e| SalesError::Task(format!("{}: {}", operation, e)))?,
            Err(_) => Err(SalesError::Timeout {
                operation,
                timeout: self.op_timeout,
            }),
        }
    }

    /// Serialize a record and insert it as a new document.
    pub async fn insert_record<T: Serialize>(
        &self,
        collection: Collection,
        record: &T,
    ) -> SalesResult<String> {
        let document = serde_json::to_value(record)?;
        self.run("insert_one", move |store| store.insert_one(collection, document))
            .await
    }

    /// Serialize a record and upsert it by the collection's natural key.
    pub async fn upsert_record<T: Serialize>(
        &self,
        collection: Collection,
        record: &T,
    ) -> SalesResult<UpsertOutcome> {
        let document = serde_json::to_value(record)?;
        self.run("upsert_one", move |store| store.upsert_one(collection, document))
            .await
    }

    pub async fn flush(&self) -> SalesResult<()> {
        self.run("flush", |store| store.flush()).await
    }
}
