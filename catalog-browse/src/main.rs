//! catalog-browse - read-only catalog browse service
//!
//! Serves facet counts and query corrections over a catalog database that the
//! archive application owns. The catalog is opened read-only.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use catalog_browse::{build_router, AppState};
use catalog_common::config::{resolve_database_path, CatalogConfig, LoggingConfig};
use catalog_common::db::connect_readonly;
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for catalog-browse
#[derive(Parser, Debug)]
#[command(name = "catalog-browse")]
#[command(about = "Read-only catalog browse service")]
#[command(version)]
struct Args {
    /// Config file (overrides CATALOG_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog database (overrides CATALOG_DATABASE and the config file)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing starts so its log level applies
    let config = CatalogConfig::load_resolved(args.config.as_deref())
        .context("Failed to load configuration")?;
    init_tracing(&config.logging)?;

    info!(
        "Starting catalog-browse v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db_path = resolve_database_path(args.database.as_deref(), &config);
    info!("Database path: {}", db_path.display());

    let pool = match connect_readonly(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to catalog: {}", e);
            return Err(e.into());
        }
    };

    if config.browse.assume_authenticated {
        warn!("assume_authenticated is set: unpublished records are visible to every request");
    }

    let port = args.port.unwrap_or(config.port);
    let addr = format!("{}:{}", config.bind_address, port);

    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("catalog-browse listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing from the logging config; `RUST_LOG` takes precedence
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "catalog_browse={level},catalog_facets={level},catalog_fuzzy={level},catalog_common={level}",
            level = logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Arc::new(file)),
                )
                .init();
        }
        None => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
