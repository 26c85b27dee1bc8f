//! Reading and normalizing sales rows.

use crate::constants::SALES_COLUMNS;
use crate::error::{SalesError, SalesResult};
use crate::models::{Customer, Order, Product};
use csv::StringRecord;
use log::debug;
use std::fs::File;
use std::path::{Path, PathBuf};

/// One data row of the sales file, split into its positional columns.
///
/// Column order: order id, product id, customer id, product name, category,
/// region, date of sale, quantity sold, unit price, discount, shipping cost,
/// payment method, customer name, customer email, customer address.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRow {
    pub order_id: String,
    pub product_id: String,
    pub customer_id: String,
    pub product_name: String,
    pub category: String,
    pub region: String,
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

impl SalesRow {
    /// Normalize a raw record. Unparseable numbers become zero; a record
    /// with too few columns is rejected. Extra columns are ignored.
    pub fn from_record(record: &StringRecord) -> SalesResult<Self> {
        if record.len() < SALES_COLUMNS {
            return Err(SalesError::invalid_input(format!(
                "expected {} columns, found {}",
                SALES_COLUMNS,
                record.len()
            )));
        }
        let text = |i: usize| record.get(i).unwrap_or_default().to_string();
        let raw = |i: usize| record.get(i).unwrap_or_default();

        Ok(Self {
            order_id: text(0),
            product_id: text(1),
            customer_id: text(2),
            product_name: text(3),
            category: text(4),
            region: text(5),
            date_of_sale: text(6),
            quantity_sold: parse_quantity(raw(7)),
            unit_price: parse_amount(raw(8)),
            discount: parse_amount(raw(9)),
            shipping_cost: parse_amount(raw(10)),
            payment_method: text(11),
            customer_name: text(12),
            customer_email: text(13),
            customer_address: text(14),
        })
    }

    pub fn product(&self) -> Product {
        Product {
            id: None,
            product_id: self.product_id.clone(),
            product_name: self.product_name.clone(),
            category: self.category.clone(),
            unit_price: self.unit_price,
        }
    }

    pub fn customer(&self) -> Customer {
        Customer {
            id: None,
            customer_id: self.customer_id.clone(),
            customer_name: self.customer_name.clone(),
            customer_email: self.customer_email.clone(),
            customer_address: self.customer_address.clone(),
        }
    }

    pub fn order(&self) -> Order {
        Order {
            id: None,
            order_id: self.order_id.clone(),
            product_id: self.product_id.clone(),
            customer_id: self.customer_id.clone(),
            product_name: self.product_name.clone(),
            category: self.category.clone(),
            region: self.region.clone(),
            date_of_sale: self.date_of_sale.clone(),
            quantity_sold: self.quantity_sold,
            unit_price: self.unit_price,
            discount: self.discount,
            shipping_cost: self.shipping_cost,
            payment_method: self.payment_method.clone(),
            customer_name: self.customer_name.clone(),
            customer_email: self.customer_email.clone(),
            customer_address: self.customer_address.clone(),
        }
    }
}

/// Parse a quantity column, falling back to zero.
pub fn parse_quantity(value: &str) -> u32 {
    match value.parse::<u32>() {
        Ok(n) => n,
        Err(e) => {
            debug!("failed to parse quantity '{}': {}", value, e);
            0
        }
    }
}

/// Parse a currency column, falling back to zero. Non-finite values count
/// as unparseable.
pub fn parse_amount(value: &str) -> f64 {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        Ok(n) => {
            debug!("ignoring non-finite amount '{}' ({})", value, n);
            0.0
        }
        Err(e) => {
            debug!("failed to parse amount '{}': {}", value, e);
            0.0
        }
    }
}

/// Read every data row of a sales file.
///
/// Fails when the file cannot be opened, when the header row is missing or
/// unreadable, or when any record is malformed. Rows may differ in length;
/// short rows are rejected later, per row.
pub fn read_rows(path: &Path) -> SalesResult<Vec<StringRecord>> {
    let file = File::open(path).map_err(|e| SalesError::FileOpen {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut records = reader.records();
    match records.next() {
        Some(Ok(_header)) => {}
        Some(Err(e)) => return Err(SalesError::Header(e.to_string())),
        None => return Err(SalesError::Header("file is empty".to_string())),
    }

    Ok(records.collect::<Result<Vec<_>, _>>()?)
}

/// [`read_rows`] on the blocking pool.
pub async fn read_sales_file(path: PathBuf) -> SalesResult<Vec<StringRecord>> {
    tokio::task::spawn_blocking(move || read_rows(&path))
        .await
        .map_err(|e| SalesError::Task(format!("read sales file: {}", e)))?
}
