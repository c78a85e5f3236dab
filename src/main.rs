//! DataItem service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum router ──▶ handlers ──▶ DataItemStore ──▶ SQLite
//!                      (request id,     (validate,    (one statement
//!                       trace, limits)   map errors)    per call)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use dataitem_service::config::{load_config, validate_config, ConfigError, ServiceConfig};
use dataitem_service::lifecycle::{wait_for_signal, Shutdown};
use dataitem_service::observability::{logging, metrics};
use dataitem_service::{HttpServer, SqliteStore};

#[derive(Parser)]
#[command(name = "dataitem-service")]
#[command(about = "HTTP CRUD service for DataItem records", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "DATAITEM_CONFIG")]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(long, env = "DATAITEM_BIND_ADDRESS")]
    bind: Option<String>,

    /// Override database.path (`:memory:` for an in-memory database).
    #[arg(long, env = "DATAITEM_DATABASE_PATH")]
    database: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<ServiceConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
    }
    if let Some(database) = &cli.database {
        config.database.path = database.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init_logging(&config.observability);

    tracing::info!("dataitem-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        database = %config.database.path,
        route_prefix = %config.api.route_prefix,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let store = SqliteStore::open(&config.database)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, Arc::new(store));
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    wait_for_signal().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
