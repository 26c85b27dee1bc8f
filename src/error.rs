use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Unified error type for the sales metrics service.
///
/// Startup code treats any of these as fatal. Request handlers map
/// [`SalesError::InvalidInput`] to a 400 response and everything else to a
/// 500 response carrying the display text.
#[derive(Error, Debug)]
pub enum SalesError {
    /// Errors raised by the underlying sled store
    #[error("Database error: {0}")]
    Database(String),

    /// Errors related to serialization/deserialization of documents
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The ingestion file could not be opened
    #[error("Failed to open CSV file {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The header row of the ingestion file could not be read
    #[error("Failed to read CSV headers: {0}")]
    Header(String),

    /// A record of the ingestion file could not be read
    #[error("Failed to read CSV rows: {0}")]
    Csv(#[from] csv::Error),

    /// Errors related to IO operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or missing request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An aggregation produced no result group at all
    #[error("no data found")]
    NoData,

    /// A store operation did not finish within the session timeout
    #[error("{operation} timed out after {}s", timeout.as_secs())]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// The blocking task running a store operation failed
    #[error("Store task failed: {0}")]
    Task(String),
}

impl SalesError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error was caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Conversion from sled::Error to SalesError
impl From<sled::Error> for SalesError {
    fn from(error: sled::Error) -> Self {
        SalesError::Database(error.to_string())
    }
}

/// Result type alias for sales metrics operations
pub type SalesResult<T> = Result<T, SalesError>;
