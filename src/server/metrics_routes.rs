use super::http_helpers::{error_response, json_result};
use super::http_server::AppState;
use crate::error::{SalesError, SalesResult};
use crate::metrics::DateRange;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

/// Query-string parameters accepted by the metric endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct MetricsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub region: Option<String>,
}

impl MetricsQuery {
    /// Requested range; absent bounds take the wide defaults. Present but
    /// empty bounds are used as given.
    pub fn date_range(&self) -> DateRange {
        let defaults = DateRange::default();
        DateRange::new(
            self.start_date.clone().unwrap_or(defaults.start),
            self.end_date.clone().unwrap_or(defaults.end),
        )
    }

    /// Requested list length. Must be a positive integer when given.
    pub fn limit(&self) -> SalesResult<Option<usize>> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Some(n)),
                _ => Err(SalesError::invalid_input(format!(
                    "limit must be a positive integer, got '{}'",
                    raw
                ))),
            },
        }
    }

    fn category(&self) -> &str {
        self.category.as_deref().unwrap_or_default()
    }

    fn region(&self) -> &str {
        self.region.as_deref().unwrap_or_default()
    }
}

pub async fn total_revenue(
    query: web::Query<MetricsQuery>,
    state: web::Data<AppState>,
) -> impl Responder {
    let range = query.date_range();
    json_result("total_revenue", state.metrics.total_revenue(&range).await)
}

pub async fn revenue_by_product(
    query: web::Query<MetricsQuery>,
    state: web::Data<AppState>,
) -> impl Responder {
    let range = query.date_range();
    json_result(
        "revenue_by_product",
        state.metrics.revenue_by_product(&range).await,
    )
}

pub async fn revenue_by_category(
    query: web::Query<MetricsQuery>,
    state: web::Data<AppState>,
) -> impl Responder {
    let range = query.date_range();
    json_result(
        "revenue_by_category",
        state.metrics.revenue_by_category(&range).await,
    )
}

pub async fn revenue_by_region(
    query: web::Query<MetricsQuery>,
    state: web::Data<AppState>,
) -> impl Responder {
    let range = query.date_range();
    json_result(
        "revenue_by_region",
        state.metrics.revenue_by_region(&range).await,
    )
}

pub async fn top_products(
    query: web::Query<MetricsQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let limit = match query.limit() {
        Ok(limit) => limit,
        Err(e) => return error_response(&e),
    };
    let range = query.date_range();
    json_result(
        "top_products_overall",
        state.metrics.top_products(&range, limit).await,
    )
}

pub async fn top_products_by_category(
    query: web::Query<MetricsQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let limit = match query.limit() {
        Ok(limit) => limit,
        Err(e) => return error_response(&e),
    };
    let range = query.date_range();
    json_result(
        "top_products_by_category",
        state
            .metrics
            .top_products_by_category(&range, query.category(), limit)
            .await,
    )
}

pub async fn top_products_by_region(
    query: web::Query<MetricsQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let limit = match query.limit() {
        Ok(limit) => limit,
        Err(e) => return error_response(&e),
    };
    let range = query.date_range();
    json_result(
        "top_products_by_region",
        state
            .metrics
            .top_products_by_region(&range, query.region(), limit)
            .await,
    )
}

pub async fn total_customers(
    query: web::Query<MetricsQuery>,
    state: web::Data<AppState>,
) -> impl Responder {
    let range = query.date_range();
    json_result("total_customers", state.metrics.total_customers(&range).await)
}

pub async fn total_orders(
    query: web::Query<MetricsQuery>,
    state: web::Data<AppState>,
) -> impl Responder {
    let range = query.date_range();
    json_result("total_orders", state.metrics.total_orders(&range).await)
}

pub async fn average_order_value(
    query: web::Query<MetricsQuery>,
    state: web::Data<AppState>,
) -> impl Responder {
    let range = query.date_range();
    json_result(
        "average_order_value",
        state.metrics.average_order_value(&range).await,
    )
}
