//! Database migration management commands.

use clap::{Args, Subcommand};

use skyseat_core::config::AppConfig;
use skyseat_core::error::AppError;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    let db = super::connect(config).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            db.migrate().await?;
            output::print_success("All migrations applied successfully.");
        }
    }

    db.close().await;
    Ok(())
}
