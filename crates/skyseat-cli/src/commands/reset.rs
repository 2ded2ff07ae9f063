//! Administrative reset command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use skyseat_core::config::AppConfig;
use skyseat_core::error::AppError;
use skyseat_entity::allocation::ResetSummary;
use skyseat_service::AdminService;

use crate::output::{self, OutputFormat};

/// Arguments for the reset command
#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Skip confirmation prompt
    #[arg(long)]
    pub force: bool,
}

/// Execute the reset command
pub async fn execute(
    args: &ResetArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    if !args.force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt("This will free EVERY seat and clear EVERY check-in. Continue?")
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let admin = AdminService::new(super::open_store(config).await?);
    let summary = admin.reset().await?;

    match format {
        OutputFormat::Table => output::print_success(&format!(
            "Reset complete: {} seats released, {} bookings cleared.",
            summary.seats_released, summary.bookings_cleared
        )),
        OutputFormat::Json => output::print_row(&ResetRow::from(summary), format),
    }
    Ok(())
}

#[derive(Serialize, Tabled)]
struct ResetRow {
    seats_released: u64,
    bookings_cleared: u64,
}

impl From<ResetSummary> for ResetRow {
    fn from(summary: ResetSummary) -> Self {
        Self {
            seats_released: summary.seats_released,
            bookings_cleared: summary.bookings_cleared,
        }
    }
}
