//! Pool status command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use skyseat_core::config::AppConfig;
use skyseat_core::error::AppError;
use skyseat_core::types::FlightId;
use skyseat_service::AdminService;

use crate::output::{self, OutputFormat};

/// Arguments for the status command
#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Flight ID
    #[arg(long)]
    pub flight: FlightId,
}

#[derive(Serialize, Tabled)]
struct StatusRow {
    flight_id: String,
    total: u64,
    available: u64,
    assigned: u64,
}

/// Execute the status command
pub async fn execute(
    args: &StatusArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let admin = AdminService::new(super::open_store(config).await?);
    let status = admin.pool_status(args.flight).await?;

    if status.total == 0 {
        output::print_warning(&format!("Flight {} has no seats.", args.flight));
    }

    output::print_row(
        &StatusRow {
            flight_id: status.flight_id.to_string(),
            total: status.total,
            available: status.available,
            assigned: status.assigned,
        },
        format,
    );
    Ok(())
}
