//! HTTP facade over the metrics service and the refresh endpoint.

pub mod http_helpers;
pub mod http_server;
pub mod log_routes;
pub mod metrics_routes;

pub use http_server::{configure_routes, AppState, SalesHttpServer};
