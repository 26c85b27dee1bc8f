use crate::constants::{DEFAULT_END_DATE, DEFAULT_START_DATE, TOP_PRODUCTS_LIMIT};
use crate::db_operations::Filter;
use serde::{Deserialize, Serialize};

/// Inclusive `[start, end]` range over `date_of_sale`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl Default for DateRange {
    fn default() -> Self {
        Self::new(DEFAULT_START_DATE, DEFAULT_END_DATE)
    }
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn filter(&self) -> Filter {
        Filter::new().between("date_of_sale", self.start.as_str(), self.end.as_str())
    }
}

/// One entry of a top-products list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub product_name: String,
    /// Total quantity sold in the range
    pub quantity_sold: i64,
}

/// Length of a top-products list for a requested limit; never above
/// [`TOP_PRODUCTS_LIMIT`].
pub fn effective_limit(requested: Option<usize>) -> usize {
    requested.map_or(TOP_PRODUCTS_LIMIT, |n| n.min(TOP_PRODUCTS_LIMIT))
}
