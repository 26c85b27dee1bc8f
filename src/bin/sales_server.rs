use clap::Parser;
use log::{error, info};
use sales_metrics::constants::DEFAULT_ENV_FILE;
use sales_metrics::{load_data, logging, SalesHttpServer, ServiceConfig, StoreSession};
use std::path::PathBuf;

/// Command line options for the sales metrics server.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Port for the HTTP server; overrides the port of SALES_BIND_ADDRESS
    #[arg(long)]
    port: Option<u16>,

    /// CSV file for the initial load; overrides SALES_CSV_PATH
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Env file read before the environment
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Start serving without running the initial load
    #[arg(long)]
    skip_initial_load: bool,
}

/// Main entry point for the sales metrics server.
///
/// Loads configuration, connects to the store, ingests the configured CSV
/// file and then serves the metrics API until shut down.
///
/// # Environment Variables
///
/// * `SALES_STORE_URI` - Store connection string (required)
/// * `SALES_CSV_PATH` - Initial-load file (default: salesData/sales.csv)
/// * `SALES_BIND_ADDRESS` - HTTP bind address (default: 0.0.0.0:8080)
/// * `SALES_LOAD_STRATEGY` - `upsert` or `insert` (default: upsert)
/// * `SALES_STORE_TIMEOUT_SECS` - Per-operation store timeout (default: 15)
///
/// # Errors
///
/// Returns an error if:
/// * The env file is malformed or required configuration is missing
/// * The store cannot be opened
/// * The initial-load file cannot be opened or read
/// * The HTTP server cannot be started
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init().ok();
    info!("Starting sales metrics server...");

    let cli = Cli::parse();

    if ServiceConfig::load_env_file(&cli.env_file)? {
        info!("Loaded environment from {}", cli.env_file.display());
    }

    let mut config = ServiceConfig::from_env()?;
    if let Some(port) = cli.port {
        config = config.with_port(port);
    }
    if let Some(csv) = cli.csv {
        config = config.with_csv_path(csv);
    }
    info!("Config loaded successfully");

    let session = StoreSession::connect(&config.store_uri)
        .map_err(|e| {
            error!("Failed to connect to store {}: {}", config.store_uri, e);
            e
        })?
        .with_timeout(config.store_timeout());
    info!("Connected to store {}", config.store_uri);

    if cli.skip_initial_load {
        info!("Skipping initial load");
    } else {
        let report = load_data(&session, &config.csv_path, config.load_strategy)
            .await
            .map_err(|e| {
                error!("Initial load failed: {}", e);
                e
            })?;
        info!("Initial load finished: {}", report);
    }

    let http_server = SalesHttpServer::new(session, &config.bind_address);
    http_server.run().await?;

    Ok(())
}
