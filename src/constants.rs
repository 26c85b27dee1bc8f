/// Common constants used across the sales metrics service.
///
/// These defaults are used for command line arguments and
/// configuration when explicit values are not provided.
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_CSV_PATH: &str = "salesData/sales.csv";
pub const DEFAULT_ENV_FILE: &str = "config/config.env";

/// Name of the store database holding the three collections.
pub const DATABASE_NAME: &str = "sales_db";

/// Per-operation store timeout in seconds.
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 15;

/// Date bounds applied when a request omits `start_date` / `end_date`.
pub const DEFAULT_START_DATE: &str = "2020-01-01";
pub const DEFAULT_END_DATE: &str = "2025-01-01";

/// Hard cap on the length of every top-products list.
pub const TOP_PRODUCTS_LIMIT: usize = 10;

/// Number of positional columns in a sales row.
pub const SALES_COLUMNS: usize = 15;

/// Lines kept by the in-memory log ring.
pub const LOG_BUFFER_CAPACITY: usize = 1000;
