//! Search Provisioner Main Entry Point
//!
//! Reconciles the search indexes, data sources and indexers on the configured
//! Azure Search service, prints a summary and waits for the operator.

use dotenv::dotenv;
use search_provisioner::{Dependencies, ProvisionError, ProvisionerConfig};
use std::env;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), ProvisionError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("search_provisioner=info,search_provisioner_repository=info")
    });

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| ProvisionError::config(e.to_string()))?;

        info!(
            service_name = "search-provisioner",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| ProvisionError::config(e.to_string()))?;

        info!(
            service_name = "search-provisioner",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

/// Block until the operator presses Enter.
async fn wait_for_operator() -> Result<(), ProvisionError> {
    let mut stdout = io::stdout();
    stdout.write_all(b"Press Enter to continue...\n").await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(io::stdin()).read_line(&mut line).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ProvisionError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting search provisioner");

    let config = ProvisionerConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to read configuration");
        e
    })?;

    let deps = match Dependencies::new(&config) {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    match deps.runner.run_all(&config.connections).await {
        Ok(report) => {
            info!("Search provisioner completed successfully");
            println!("{}", report);
        }
        Err(e) => {
            error!(error = %e, "Search provisioner failed");
            return Err(e);
        }
    }

    if config.pause_on_exit {
        wait_for_operator().await?;
    }

    Ok(())
}
