//! SkySeat Server: contention-safe seat allocation over HTTP.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use skyseat_core::config::AppConfig;
use skyseat_core::error::AppError;
use skyseat_database::DatabasePool;
use skyseat_service::PgSeatStore;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from `SKYSEAT_CONFIG` if set, else from
/// `config/default.toml` plus the `SKYSEAT_ENV` overlay.
fn load_configuration() -> Result<AppConfig, AppError> {
    if let Ok(path) = std::env::var("SKYSEAT_CONFIG") {
        return AppConfig::from_file(&path);
    }
    let env = std::env::var("SKYSEAT_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting SkySeat");

    let db = DatabasePool::connect(&config.database).await?;
    db.migrate().await?;

    let store = Arc::new(PgSeatStore::new(db.clone()));
    let result = skyseat_api::run_server(config, store).await;

    db.close().await;
    result
}
