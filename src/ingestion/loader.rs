//! Initial load run once at process start.

use super::reader::{read_sales_file, SalesRow};
use super::refresh::upsert_rows;
use super::{IngestionReport, LoadStrategy};
use crate::db_operations::{Collection, StoreSession, UpsertOutcome};
use crate::error::SalesResult;
use csv::StringRecord;
use log::{info, warn};
use std::collections::HashSet;
use std::path::Path;

/// Load every row of `path` into the store.
///
/// Returns an error only when the file cannot be opened or read; failed
/// rows are logged and counted in the report.
pub async fn load_data(
    session: &StoreSession,
    path: impl AsRef<Path>,
    strategy: LoadStrategy,
) -> SalesResult<IngestionReport> {
    let path = path.as_ref();
    let records = read_sales_file(path.to_path_buf()).await?;
    info!(
        "Loading {} rows from {} ({} strategy)",
        records.len(),
        path.display(),
        strategy
    );

    let report = match strategy {
        LoadStrategy::Upsert => upsert_rows(session, &records).await,
        LoadStrategy::Insert => insert_rows(session, &records).await,
    };

    if let Err(e) = session.flush().await {
        warn!("Failed to flush store after load: {}", e);
    }
    info!("CSV data loaded from {}: {}", path.display(), report);
    Ok(report)
}

/// Ids already written during one insert-once pass.
#[derive(Default)]
struct SeenIds {
    products: HashSet<String>,
    customers: HashSet<String>,
}

async fn insert_rows(session: &StoreSession, records: &[StringRecord]) -> IngestionReport {
    let mut report = IngestionReport::default();
    let mut seen = SeenIds::default();

    for (index, record) in records.iter().enumerate() {
        // header is line 1
        let line = index + 2;
        let outcome = match SalesRow::from_record(record) {
            Ok(row) => insert_row(session, &row, &mut seen, &mut report).await,
            Err(e) => {
                warn!("Skipping line {}: {}", line, e);
                Err(e)
            }
        };
        report.record_row(&outcome);
    }
    report
}

/// Insert one row. A product or customer failure abandons the row before
/// its order is written.
async fn insert_row(
    session: &StoreSession,
    row: &SalesRow,
    seen: &mut SeenIds,
    report: &mut IngestionReport,
) -> SalesResult<()> {
    if seen.products.contains(&row.product_id) {
        report.products.skipped += 1;
    } else {
        if let Err(e) = session.insert_record(Collection::Products, &row.product()).await {
            warn!("failed to insert product {}: {}", row.product_id, e);
            report.products.failed += 1;
            report.customers.skipped += 1;
            report.orders.skipped += 1;
            return Err(e);
        }
        report.products.record(UpsertOutcome::Inserted);
        seen.products.insert(row.product_id.clone());
    }

    if seen.customers.contains(&row.customer_id) {
        report.customers.skipped += 1;
    } else {
        if let Err(e) = session.insert_record(Collection::Customers, &row.customer()).await {
            warn!("failed to insert customer {}: {}", row.customer_id, e);
            report.customers.failed += 1;
            report.orders.skipped += 1;
            return Err(e);
        }
        report.customers.record(UpsertOutcome::Inserted);
        seen.customers.insert(row.customer_id.clone());
    }

    if let Err(e) = session.insert_record(Collection::Orders, &row.order()).await {
        warn!("failed to insert order {}: {}", row.order_id, e);
        report.orders.failed += 1;
        return Err(e);
    }
    report.orders.record(UpsertOutcome::Inserted);
    Ok(())
}
