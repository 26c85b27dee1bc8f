use serde::{Deserialize, Serialize};

/// One sales transaction, denormalized with the product and customer
/// details current at the time of sale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub order_id: String,
    pub product_id: String,
    pub customer_id: String,
    pub product_name: String,
    pub category: String,
    pub region: String,
    /// `YYYY-MM-DD`; range filters compare it as a plain string
    pub date_of_sale: String,
    pub quantity_sold: u32,
    pub unit_price: f64,
    pub discount: f64,
    pub shipping_cost: f64,
    pub payment_method: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_address: String,
}

impl Order {
    /// Gross value of the order line, before discount and shipping.
    pub fn revenue(&self) -> f64 {
        f64::from(self.quantity_sold) * self.unit_price
    }
}
