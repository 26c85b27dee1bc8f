use super::pipelines::{self, RevenueDimension, REVENUE, TOTAL_ORDERS, TOTAL_QUANTITY, TOTAL_VALUE};
use super::types::{effective_limit, DateRange, TopProduct};
use crate::db_operations::{Collection, Filter, Pipeline, StoreSession, GROUP_ID};
use crate::error::{SalesError, SalesResult};
use serde_json::Value;
use std::collections::HashMap;

/// Read-only aggregate queries over the `orders` collection.
///
/// Each query is a single store operation issued through the shared
/// session, so it is bounded by the session timeout.
#[derive(Clone)]
pub struct MetricsService {
    session: StoreSession,
}

impl MetricsService {
    pub fn new(session: StoreSession) -> Self {
        Self { session }
    }

    async fn aggregate(&self, pipeline: Pipeline) -> SalesResult<Vec<Value>> {
        self.session
            .run("aggregate", move |store| store.aggregate(Collection::Orders, &pipeline))
            .await
    }

    /// Σ quantity × unit price over orders in range; 0 when none match.
    pub async fn total_revenue(&self, range: &DateRange) -> SalesResult<f64> {
        let groups = self.aggregate(pipelines::total_revenue(range)).await?;
        match groups.first() {
            Some(group) => number(group, REVENUE),
            None => Ok(0.0),
        }
    }

    pub async fn revenue_by_product(&self, range: &DateRange) -> SalesResult<HashMap<String, f64>> {
        self.revenue_by(range, RevenueDimension::Product).await
    }

    pub async fn revenue_by_category(&self, range: &DateRange) -> SalesResult<HashMap<String, f64>> {
        self.revenue_by(range, RevenueDimension::Category).await
    }

    pub async fn revenue_by_region(&self, range: &DateRange) -> SalesResult<HashMap<String, f64>> {
        self.revenue_by(range, RevenueDimension::Region).await
    }

    /// Revenue per distinct value of `dimension`. Key order is unspecified.
    pub async fn revenue_by(
        &self,
        range: &DateRange,
        dimension: RevenueDimension,
    ) -> SalesResult<HashMap<String, f64>> {
        let groups = self.aggregate(pipelines::revenue_by(range, dimension)).await?;
        groups
            .iter()
            .map(|g| -> SalesResult<(String, f64)> { Ok((group_key(g), number(g, REVENUE)?)) })
            .collect()
    }

    pub async fn top_products(
        &self,
        range: &DateRange,
        limit: Option<usize>,
    ) -> SalesResult<Vec<TopProduct>> {
        self.ranked_products(range, Filter::new(), limit).await
    }

    pub async fn top_products_by_category(
        &self,
        range: &DateRange,
        category: &str,
        limit: Option<usize>,
    ) -> SalesResult<Vec<TopProduct>> {
        self.ranked_products(range, Filter::new().eq("category", category), limit)
            .await
    }

    pub async fn top_products_by_region(
        &self,
        range: &DateRange,
        region: &str,
        limit: Option<usize>,
    ) -> SalesResult<Vec<TopProduct>> {
        self.ranked_products(range, Filter::new().eq("region", region), limit)
            .await
    }

    async fn ranked_products(
        &self,
        range: &DateRange,
        extra: Filter,
        limit: Option<usize>,
    ) -> SalesResult<Vec<TopProduct>> {
        let pipeline = pipelines::top_products(range, extra, effective_limit(limit));
        let groups = self.aggregate(pipeline).await?;
        groups
            .iter()
            .map(|g| -> SalesResult<TopProduct> {
                Ok(TopProduct {
                    product_name: group_key(g),
                    quantity_sold: integer(g, TOTAL_QUANTITY)?,
                })
            })
            .collect()
    }

    /// Number of distinct customers with at least one order in range.
    pub async fn total_customers(&self, range: &DateRange) -> SalesResult<u64> {
        let filter = range.filter();
        let ids = self
            .session
            .run("distinct", move |store| {
                store.distinct(Collection::Orders, "customer_id", &filter)
            })
            .await?;
        Ok(ids.len() as u64)
    }

    pub async fn total_orders(&self, range: &DateRange) -> SalesResult<u64> {
        let filter = range.filter();
        self.session
            .run("count", move |store| store.count(Collection::Orders, &filter))
            .await
    }

    /// Revenue divided by order count.
    ///
    /// Fails with [`SalesError::NoData`] when no order falls in the range,
    /// since the aggregation then yields no group at all.
    pub async fn average_order_value(&self, range: &DateRange) -> SalesResult<f64> {
        let groups = self.aggregate(pipelines::order_value_summary(range)).await?;
        let summary = groups.first().ok_or(SalesError::NoData)?;
        let total_orders = integer(summary, TOTAL_ORDERS)?;
        if total_orders == 0 {
            return Ok(0.0);
        }
        Ok(number(summary, TOTAL_VALUE)? / total_orders as f64)
    }
}

/// Numeric aggregate output. Sums that overflowed to a non-finite value
/// come back as null and are reported, not read as zero.
fn number(group: &Value, field: &str) -> SalesResult<f64> {
    group[field]
        .as_f64()
        .ok_or_else(|| non_numeric(group, field))
}

fn integer(group: &Value, field: &str) -> SalesResult<i64> {
    group[field]
        .as_i64()
        .ok_or_else(|| non_numeric(group, field))
}

fn non_numeric(group: &Value, field: &str) -> SalesError {
    SalesError::Database(format!(
        "aggregate field '{}' is not numeric in group {}",
        field, group
    ))
}

fn group_key(group: &Value) -> String {
    match &group[GROUP_ID] {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
