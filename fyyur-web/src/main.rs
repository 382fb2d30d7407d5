//! fyyur-web - venue/artist/show booking directory
//!
//! Settings resolve CLI > environment > config.toml > compiled defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fyyur_common::config::{
    CompiledDefaults, RootFolderInitializer, RootFolderResolver, TomlConfig,
};
use fyyur_common::db::init_database;
use fyyur_web::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};

mod logging;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "fyyur-web")]
#[command(about = "Venue, artist and show booking directory")]
#[command(version)]
struct Args {
    /// Folder holding fyyur.db
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// HTTP port
    #[arg(short, long, env = "FYYUR_PORT")]
    port: Option<u16>,

    /// Bind address
    #[arg(long, env = "FYYUR_HOST")]
    host: Option<String>,

    /// Also write warnings and errors to this file
    #[arg(long)]
    error_log: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = TomlConfig::load_or_default();
    let defaults = CompiledDefaults::for_current_platform();

    let level = config
        .logging
        .level
        .clone()
        .unwrap_or(defaults.log_level.clone());
    let error_log = args
        .error_log
        .clone()
        .or_else(|| config.logging.error_log.clone())
        .or(defaults.error_log.clone());
    let _log_guard = logging::init(&level, error_log.as_deref())?;

    // Build identification first, before any database work
    info!(
        "Starting Fyyur (fyyur-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let host = args
        .host
        .clone()
        .or_else(|| config.server.host.clone())
        .unwrap_or(defaults.host.clone());
    let port = args.port.or(config.server.port).unwrap_or(defaults.port);

    let root_folder = RootFolderResolver::new("fyyur-web")
        .with_cli_arg(args.root_folder.clone())
        .with_config(config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;
    info!("Root folder: {}", initializer.root_folder().display());

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e).context("Database initialization failed");
        }
    };

    let app = build_router(AppState::new(pool.clone()));

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid bind address {host}:{port}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!("fyyur-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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
