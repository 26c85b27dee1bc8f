//! # Sales Metrics Library
//!
//! Ingests a sales spreadsheet export into a document store and answers a
//! fixed catalog of aggregate analytics queries over HTTP.
//!
//! ## Core Components
//!
//! * `config` - Service configuration loaded from the environment
//! * `db_operations` - Document store over sled with filter and aggregation support
//! * `error` - Error types and handling
//! * `ingestion` - CSV initial load and idempotent refresh
//! * `logging` - Process logger with an in-memory ring of recent lines
//! * `metrics` - Revenue, product ranking, customer and order aggregates
//! * `models` - Order, product and customer records
//! * `server` - HTTP facade exposing ingestion and metrics
//!
//! ## Architecture
//!
//! One long-lived [`StoreSession`] is opened at startup and handed to both
//! the ingestion pass and the HTTP server. Every store operation runs on the
//! blocking pool under a per-operation timeout. Orders are denormalized
//! (they carry product name, category and region), so every metric is a
//! single aggregation over the `orders` collection.

pub mod config;
pub mod constants;
pub mod db_operations;
pub mod error;
pub mod ingestion;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod server;

// Re-export main types for convenience
pub use config::ServiceConfig;
pub use db_operations::{Collection, DocumentStore, SledStore, StoreSession};
pub use error::{SalesError, SalesResult};
pub use ingestion::{load_data, refresh_data, IngestionReport, LoadStrategy};
pub use metrics::{DateRange, MetricsService, TopProduct};
pub use models::{Customer, Order, Product};
pub use server::{configure_routes, AppState, SalesHttpServer};
