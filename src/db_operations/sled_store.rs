use super::core::{Collection, DocumentStore, UpsertOutcome};
use super::filter::Filter;
use crate::constants::DATABASE_NAME;
use crate::error::{SalesError, SalesResult};
use log::info;
use serde_json::Value;
use std::path::PathBuf;

/// Parsed store connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUri {
    /// Temporary store discarded when the process exits (`mem://`)
    Memory,
    /// On-disk store at the given directory (`sled://<path>` or a bare path)
    Path(PathBuf),
}

impl StoreUri {
    pub fn parse(uri: &str) -> SalesResult<Self> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(SalesError::config("store connection string is empty"));
        }
        if uri == "mem://" || uri == "memory" {
            return Ok(StoreUri::Memory);
        }
        let path = uri.strip_prefix("sled://").unwrap_or(uri);
        if path.is_empty() {
            return Err(SalesError::config(format!("store connection string '{}' has no path", uri)));
        }
        Ok(StoreUri::Path(PathBuf::from(path)))
    }
}

/// Trees backing one collection.
#[derive(Clone)]
struct CollectionTrees {
    /// internal id -> JSON document
    documents: sled::Tree,
    /// natural key -> internal id of the document upserts address
    by_key: sled::Tree,
}

impl CollectionTrees {
    fn open(db: &sled::Db, collection: Collection) -> Result<Self, sled::Error> {
        let name = format!("{}.{}", DATABASE_NAME, collection.name());
        Ok(Self {
            documents: db.open_tree(&name)?,
            by_key: db.open_tree(format!("{}.by_key", name))?,
        })
    }
}

/// Document store on top of an embedded sled database.
#[derive(Clone)]
pub struct SledStore {
    db: sled::Db,
    orders: CollectionTrees,
    products: CollectionTrees,
    customers: CollectionTrees,
}

impl SledStore {
    /// Open (or create) the store named by a connection string.
    pub fn connect(uri: &str) -> SalesResult<Self> {
        let db = match StoreUri::parse(uri)? {
            StoreUri::Memory => sled::Config::new().temporary(true).open()?,
            StoreUri::Path(path) => sled::Config::new().path(path).open()?,
        };
        let store = Self::new(db)?;
        info!("Connected to document store '{}'", uri.trim());
        Ok(store)
    }

    /// Wrap an already opened sled database.
    pub fn new(db: sled::Db) -> SalesResult<Self> {
        Ok(Self {
            orders: CollectionTrees::open(&db, Collection::Orders)?,
            products: CollectionTrees::open(&db, Collection::Products)?,
            customers: CollectionTrees::open(&db, Collection::Customers)?,
            db,
        })
    }

    fn trees(&self, collection: Collection) -> &CollectionTrees {
        match collection {
            Collection::Orders => &self.orders,
            Collection::Products => &self.products,
            Collection::Customers => &self.customers,
        }
    }

    fn write(&self, trees: &CollectionTrees, id: &str, document: &Value) -> SalesResult<()> {
        let bytes = serde_json::to_vec(document)?;
        trees.documents.insert(id.as_bytes(), bytes)?;
        Ok(())
    }

    /// Replace the fields of the stored document `id` with those of
    /// `document`, keeping fields only the stored copy has.
    fn overwrite(&self, trees: &CollectionTrees, id: &str, document: Value) -> SalesResult<()> {
        let mut merged = match trees.documents.get(id.as_bytes())? {
            Some(bytes) => serde_json::from_slice::<Value>(&bytes)?,
            None => Value::Object(Default::default()),
        };
        if let (Some(target), Value::Object(fields)) = (merged.as_object_mut(), document) {
            for (name, value) in fields {
                if name != "_id" {
                    target.insert(name, value);
                }
            }
            target.insert("_id".to_string(), Value::String(id.to_string()));
        }
        self.write(trees, id, &merged)
    }
}

fn natural_key(collection: Collection, document: &Value) -> Option<String> {
    document
        .get(collection.natural_key())
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn with_id(document: Value, id: &str) -> SalesResult<Value> {
    match document {
        Value::Object(mut fields) => {
            fields.insert("_id".to_string(), Value::String(id.to_string()));
            Ok(Value::Object(fields))
        }
        other => Err(SalesError::invalid_input(format!(
            "documents must be JSON objects, got {}",
            other
        ))),
    }
}

impl DocumentStore for SledStore {
    fn insert_one(&self, collection: Collection, document: Value) -> SalesResult<String> {
        let trees = self.trees(collection);
        let id = uuid::Uuid::new_v4().to_string();
        let key = natural_key(collection, &document);
        let document = with_id(document, &id)?;
        self.write(trees, &id, &document)?;

        // the first document stored under a natural key is the one upserts address
        if let Some(key) = key {
            let _ = trees
                .by_key
                .compare_and_swap(key.as_bytes(), None as Option<&[u8]>, Some(id.as_bytes()))?;
        }
        Ok(id)
    }

    fn upsert_one(&self, collection: Collection, document: Value) -> SalesResult<UpsertOutcome> {
        let trees = self.trees(collection);
        let key = natural_key(collection, &document).ok_or_else(|| {
            SalesError::invalid_input(format!(
                "{} document has no string '{}'",
                collection,
                collection.natural_key()
            ))
        })?;

        if let Some(existing) = trees.by_key.get(key.as_bytes())? {
            let id = String::from_utf8_lossy(&existing).to_string();
            self.overwrite(trees, &id, document)?;
            return Ok(UpsertOutcome::Updated);
        }

        let id = uuid::Uuid::new_v4().to_string();
        match trees
            .by_key
            .compare_and_swap(key.as_bytes(), None as Option<&[u8]>, Some(id.as_bytes()))?
        {
            Ok(()) => {
                let document = with_id(document, &id)?;
                self.write(trees, &id, &document)?;
                Ok(UpsertOutcome::Inserted)
            }
            // a concurrent writer claimed the key first
            Err(conflict) => {
                let current = conflict
                    .current
                    .map(|bytes| String::from_utf8_lossy(&bytes).to_string())
                    .ok_or_else(|| SalesError::Database("natural key index changed during upsert".into()))?;
                self.overwrite(trees, &current, document)?;
                Ok(UpsertOutcome::Updated)
            }
        }
    }

    fn find(&self, collection: Collection, filter: &Filter) -> SalesResult<Vec<Value>> {
        let mut documents = Vec::new();
        for entry in self.trees(collection).documents.iter() {
            let (key, bytes) = entry?;
            let document: Value = serde_json::from_slice(&bytes).map_err(|e| {
                SalesError::Database(format!(
                    "corrupt document '{}' in {}: {}",
                    String::from_utf8_lossy(&key),
                    collection,
                    e
                ))
            })?;
            if filter.matches(&document) {
                documents.push(document);
            }
        }
        Ok(documents)
    }

    fn count(&self, collection: Collection, filter: &Filter) -> SalesResult<u64> {
        if filter.is_empty() {
            return Ok(self.trees(collection).documents.len() as u64);
        }
        Ok(self.find(collection, filter)?.len() as u64)
    }

    fn flush(&self) -> SalesResult<()> {
        self.db.flush()?;
        Ok(())
    }
}
