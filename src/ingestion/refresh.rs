//! Idempotent re-load: every record is upserted by its natural key.

use super::reader::{read_sales_file, SalesRow};
use super::{IngestionReport, WriteCounts};
use crate::db_operations::{Collection, StoreSession};
use crate::error::SalesResult;
use csv::StringRecord;
use log::{info, warn};
use serde::Serialize;
use std::path::Path;

/// Re-ingest `path`, upserting products, customers and orders.
///
/// Running it twice with the same file leaves exactly one document per
/// natural key. Errors only when the file cannot be opened or read.
pub async fn refresh_data(
    session: &StoreSession,
    path: impl AsRef<Path>,
) -> SalesResult<IngestionReport> {
    let path = path.as_ref();
    let records = read_sales_file(path.to_path_buf()).await?;
    info!("Refreshing {} rows from {}", records.len(), path.display());

    let report = upsert_rows(session, &records).await;

    if let Err(e) = session.flush().await {
        warn!("Failed to flush store after refresh: {}", e);
    }
    info!("Data refreshed from {}: {}", path.display(), report);
    Ok(report)
}

pub(crate) async fn upsert_rows(session: &StoreSession, records: &[StringRecord]) -> IngestionReport {
    let mut report = IngestionReport::default();

    for (index, record) in records.iter().enumerate() {
        let line = index + 2;
        let outcome = match SalesRow::from_record(record) {
            Ok(row) => upsert_row(session, &row, &mut report).await,
            Err(e) => {
                warn!("Skipping line {}: {}", line, e);
                Err(e)
            }
        };
        report.record_row(&outcome);
    }
    report
}

/// Upsert the three records of one row. A failed write does not stop the
/// remaining writes of the row; the first failure is returned.
async fn upsert_row(
    session: &StoreSession,
    row: &SalesRow,
    report: &mut IngestionReport,
) -> SalesResult<()> {
    let products = upsert_one(
        session,
        Collection::Products,
        &row.product(),
        &row.product_id,
        &mut report.products,
    )
    .await;
    let customers = upsert_one(
        session,
        Collection::Customers,
        &row.customer(),
        &row.customer_id,
        &mut report.customers,
    )
    .await;
    let orders = upsert_one(
        session,
        Collection::Orders,
        &row.order(),
        &row.order_id,
        &mut report.orders,
    )
    .await;

    match [products, customers, orders].into_iter().find_map(Result::err) {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

async fn upsert_one<T: Serialize>(
    session: &StoreSession,
    collection: Collection,
    record: &T,
    key: &str,
    counts: &mut WriteCounts,
) -> SalesResult<()> {
    match session.upsert_record(collection, record).await {
        Ok(outcome) => {
            counts.record(outcome);
            Ok(())
        }
        Err(e) => {
            warn!("Failed to upsert {} {}: {}", collection, key, e);
            counts.failed += 1;
            Err(e)
        }
    }
}
