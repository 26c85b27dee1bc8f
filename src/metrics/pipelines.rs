//! Pipeline definitions for each metric.

use super::types::DateRange;
use crate::db_operations::{Accumulator, Expr, Filter, Group, Pipeline};

pub const REVENUE: &str = "revenue";
pub const TOTAL_QUANTITY: &str = "total_quantity";
pub const TOTAL_VALUE: &str = "total_value";
pub const TOTAL_ORDERS: &str = "total_orders";

/// The field a revenue breakdown groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenueDimension {
    Product,
    Category,
    Region,
}

impl RevenueDimension {
    pub fn field(self) -> &'static str {
        match self {
            RevenueDimension::Product => "product_name",
            RevenueDimension::Category => "category",
            RevenueDimension::Region => "region",
        }
    }
}

/// quantity_sold × unit_price
pub fn line_revenue() -> Expr {
    Expr::multiply(Expr::field("quantity_sold"), Expr::field("unit_price"))
}

pub fn total_revenue(range: &DateRange) -> Pipeline {
    Pipeline::new()
        .matching(range.filter())
        .group(Group::all().accumulate(REVENUE, Accumulator::Sum(line_revenue())))
}

pub fn revenue_by(range: &DateRange, dimension: RevenueDimension) -> Pipeline {
    Pipeline::new()
        .matching(range.filter())
        .group(Group::by(dimension.field()).accumulate(REVENUE, Accumulator::Sum(line_revenue())))
}

/// Products ranked by quantity sold within the range, narrowed by `extra`.
pub fn top_products(range: &DateRange, extra: Filter, limit: usize) -> Pipeline {
    Pipeline::new()
        .matching(range.filter().and(extra))
        .group(
            Group::by("product_name")
                .accumulate(TOTAL_QUANTITY, Accumulator::Sum(Expr::field("quantity_sold"))),
        )
        .sort_desc(TOTAL_QUANTITY)
        .limit(limit)
}

/// Revenue and order count folded into a single group.
pub fn order_value_summary(range: &DateRange) -> Pipeline {
    Pipeline::new().matching(range.filter()).group(
        Group::all()
            .accumulate(TOTAL_VALUE, Accumulator::Sum(line_revenue()))
            .accumulate(TOTAL_ORDERS, Accumulator::Count),
    )
}
