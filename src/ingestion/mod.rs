//! # Ingestion
//!
//! Loads sales rows from a comma separated file into the `orders`,
//! `products` and `customers` collections.
//!
//! ## Components
//!
//! * `reader` - opens the file, drops the header and normalizes rows
//! * `loader` - initial load run at process start
//! * `refresh` - idempotent re-load behind `POST /refresh`
//! * `routes` - HTTP handler for the refresh endpoint
//!
//! Row-level failures never abort a pass. They are logged and counted in
//! the [`IngestionReport`] returned by both entry points; only failures to
//! open or read the file are returned as errors.

pub mod loader;
pub mod reader;
pub mod refresh;
pub mod routes;

use crate::db_operations::UpsertOutcome;
use crate::error::SalesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use loader::load_data;
pub use reader::{read_sales_file, SalesRow};
pub use refresh::refresh_data;

/// How the initial load writes records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStrategy {
    /// Upsert every record by natural key; safe to re-run
    #[default]
    Upsert,
    /// Insert each product and customer once per pass and every order
    /// unconditionally. Re-running against a populated store duplicates
    /// products and customers.
    Insert,
}

impl FromStr for LoadStrategy {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upsert" => Ok(LoadStrategy::Upsert),
            "insert" | "insert-once" => Ok(LoadStrategy::Insert),
            other => Err(SalesError::config(format!(
                "unknown load strategy '{}', expected 'upsert' or 'insert'",
                other
            ))),
        }
    }
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStrategy::Upsert => f.write_str("upsert"),
            LoadStrategy::Insert => f.write_str("insert"),
        }
    }
}

/// Write tally for one collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteCounts {
    pub inserted: u64,
    pub updated: u64,
    /// Writes not attempted: already seen in this pass, or the row was
    /// abandoned before reaching this write
    pub skipped: u64,
    pub failed: u64,
}

impl WriteCounts {
    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }
}

/// Outcome of one ingestion pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestionReport {
    /// Data rows read, header excluded
    pub rows_read: u64,
    pub rows_succeeded: u64,
    /// Rows with fewer than the required columns or at least one failed write
    pub rows_failed: u64,
    pub orders: WriteCounts,
    pub products: WriteCounts,
    pub customers: WriteCounts,
}

impl IngestionReport {
    pub fn record_row<E>(&mut self, outcome: &Result<(), E>) {
        self.rows_read += 1;
        match outcome {
            Ok(()) => self.rows_succeeded += 1,
            Err(_) => self.rows_failed += 1,
        }
    }
}

impl fmt::Display for IngestionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows read, {} succeeded, {} failed (orders +{}/~{}, products +{}/~{}, customers +{}/~{})",
            self.rows_read,
            self.rows_succeeded,
            self.rows_failed,
            self.orders.inserted,
            self.orders.updated,
            self.products.inserted,
            self.products.updated,
            self.customers.inserted,
            self.customers.updated,
        )
    }
}
