//! CLI command definitions and dispatch.

pub mod checkin;
pub mod flights;
pub mod migrate;
pub mod release;
pub mod reset;
pub mod seats;
pub mod status;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use skyseat_core::config::AppConfig;
use skyseat_core::error::AppError;
use skyseat_database::DatabasePool;
use skyseat_service::{PgSeatStore, SeatStore};

use crate::output::OutputFormat;

/// SkySeat: contention-safe seat allocation
#[derive(Debug, Parser)]
#[command(name = "skyseat", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file. Defaults to config/default.toml plus
    /// the overlay named by SKYSEAT_ENV.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Make every seat available and clear every binding
    Reset(reset::ResetArgs),
    /// List flights
    Flights,
    /// Show seat counts for a flight
    Status(status::StatusArgs),
    /// Show a flight's seat map
    Seats(seats::SeatsArgs),
    /// Allocate a seat to a booking
    Checkin(checkin::CheckinArgs),
    /// Release a booking's seat
    Release(release::ReleaseArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(self.config.as_deref())?;
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Reset(args) => reset::execute(args, &config, self.format).await,
            Commands::Flights => flights::execute(&config, self.format).await,
            Commands::Status(args) => status::execute(args, &config, self.format).await,
            Commands::Seats(args) => seats::execute(args, &config, self.format).await,
            Commands::Checkin(args) => checkin::execute(args, &config, self.format).await,
            Commands::Release(args) => release::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: load configuration from an explicit file or the environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, AppError> {
    match config_path {
        Some(path) => AppConfig::from_file(path),
        None => {
            let env = std::env::var("SKYSEAT_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Helper: connect to the configured database
pub async fn connect(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: open a PostgreSQL seat store
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn SeatStore>, AppError> {
    let db = connect(config).await?;
    Ok(Arc::new(PgSeatStore::new(db)))
}
