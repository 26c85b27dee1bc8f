//! Metrics service: the fixed catalog of read-only aggregate queries over
//! the `orders` collection.
//!
//! Every query takes an inclusive [`DateRange`] compared lexically against
//! `date_of_sale`. Bounds are not validated; malformed dates simply select
//! an empty or unexpected range.

pub mod pipelines;
pub mod service;
pub mod types;

pub use service::MetricsService;
pub use types::{effective_limit, DateRange, TopProduct};
