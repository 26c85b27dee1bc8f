//! Configuration for the sales metrics service

use crate::constants::{
    DEFAULT_BIND_HOST, DEFAULT_CSV_PATH, DEFAULT_HTTP_PORT, DEFAULT_STORE_TIMEOUT_SECS,
};
use crate::error::{SalesError, SalesResult};
use crate::ingestion::LoadStrategy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const STORE_URI_VAR: &str = "SALES_STORE_URI";
pub const CSV_PATH_VAR: &str = "SALES_CSV_PATH";
pub const BIND_ADDRESS_VAR: &str = "SALES_BIND_ADDRESS";
pub const LOAD_STRATEGY_VAR: &str = "SALES_LOAD_STRATEGY";
pub const STORE_TIMEOUT_VAR: &str = "SALES_STORE_TIMEOUT_SECS";

/// Runtime configuration for the service binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Connection string of the document store
    pub store_uri: String,
    /// File ingested once at process start
    pub csv_path: PathBuf,
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Write strategy of the initial load
    pub load_strategy: LoadStrategy,
    /// Timeout applied to every store operation, in seconds
    pub store_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            store_uri: String::new(),
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            bind_address: format!("{}:{}", DEFAULT_BIND_HOST, DEFAULT_HTTP_PORT),
            load_strategy: LoadStrategy::default(),
            store_timeout_secs: DEFAULT_STORE_TIMEOUT_SECS,
        }
    }
}

impl ServiceConfig {
    /// Create a configuration pointing at the given store
    pub fn new(store_uri: &str) -> Self {
        Self {
            store_uri: store_uri.to_string(),
            ..Default::default()
        }
    }

    /// Build the configuration from process environment variables.
    ///
    /// Only the store connection string is required; every other value
    /// falls back to its default.
    pub fn from_env() -> SalesResult<Self> {
        let store_uri = env::var(STORE_URI_VAR).unwrap_or_default();
        if store_uri.trim().is_empty() {
            return Err(SalesError::config(format!(
                "{} not set in environment",
                STORE_URI_VAR
            )));
        }

        let mut config = Self::new(store_uri.trim());

        if let Ok(path) = env::var(CSV_PATH_VAR) {
            config.csv_path = PathBuf::from(path);
        }
        if let Ok(address) = env::var(BIND_ADDRESS_VAR) {
            config.bind_address = address;
        }
        if let Ok(strategy) = env::var(LOAD_STRATEGY_VAR) {
            config.load_strategy = strategy.parse()?;
        }
        if let Ok(secs) = env::var(STORE_TIMEOUT_VAR) {
            config.store_timeout_secs = secs.trim().parse().map_err(|_| {
                SalesError::config(format!("{} must be a whole number of seconds", STORE_TIMEOUT_VAR))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load `KEY=VALUE` pairs from an env file into the process environment.
    ///
    /// Variables already present in the environment win. A missing file is
    /// not an error; a malformed one is.
    pub fn load_env_file(path: &Path) -> SalesResult<bool> {
        if !path.exists() {
            return Ok(false);
        }
        dotenvy::from_path(path).map_err(|e| {
            SalesError::config(format!("Failed to load env file {}: {}", path.display(), e))
        })?;
        Ok(true)
    }

    pub fn validate(&self) -> SalesResult<()> {
        if self.store_timeout_secs == 0 {
            return Err(SalesError::config("store timeout must be greater than 0"));
        }
        if self.bind_address.trim().is_empty() {
            return Err(SalesError::config("bind address must not be empty"));
        }
        Ok(())
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    pub fn with_csv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = path.into();
        self
    }

    pub fn with_bind_address(mut self, address: &str) -> Self {
        self.bind_address = address.to_string();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        let host = self
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());
        self.bind_address = format!("{}:{}", host, port);
        self
    }
}
