//! Seat release command.

use clap::Args;

use skyseat_core::config::AppConfig;
use skyseat_core::error::AppError;
use skyseat_service::AdminService;

use crate::output::{self, OutputFormat};

/// Arguments for the release command
#[derive(Debug, Args)]
pub struct ReleaseArgs {
    /// Booking reference
    #[arg(short, long)]
    pub reference: String,
}

/// Execute the release command
pub async fn execute(
    args: &ReleaseArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let admin = AdminService::new(super::open_store(config).await?);
    let released = admin.release(&args.reference).await?;

    match (format, released) {
        (OutputFormat::Json, released) => println!(
            "{}",
            serde_json::json!({ "reference": args.reference, "released_seat_id": released })
        ),
        (OutputFormat::Table, Some(seat_id)) => output::print_success(&format!(
            "Released seat {seat_id} from booking {}.",
            args.reference
        )),
        (OutputFormat::Table, None) => output::print_warning(&format!(
            "Booking {} holds no seat.",
            args.reference
        )),
    }
    Ok(())
}
