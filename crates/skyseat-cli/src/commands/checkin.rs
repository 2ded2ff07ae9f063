//! Manual check-in command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use skyseat_core::config::AppConfig;
use skyseat_core::error::AppError;
use skyseat_core::types::FlightId;
use skyseat_entity::allocation::AllocationPolicy;
use skyseat_service::AllocationService;

use crate::output::{self, OutputFormat};

/// Arguments for the checkin command
#[derive(Debug, Args)]
pub struct CheckinArgs {
    /// Booking reference
    #[arg(short, long)]
    pub reference: String,

    /// Flight ID (defaults to the booking's flight)
    #[arg(long)]
    pub flight: Option<FlightId>,

    /// Allocation policy: safe or unsafe
    #[arg(short, long, default_value = "safe")]
    pub policy: AllocationPolicy,
}

#[derive(Serialize, Tabled)]
struct AssignmentRow {
    reference: String,
    seat: String,
    policy: String,
    already_assigned: bool,
}

/// Execute the checkin command
pub async fn execute(
    args: &CheckinArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::open_store(config).await?;
    let service = AllocationService::new(store, &config.allocation);

    let assignment = service
        .allocate(args.policy, &args.reference, args.flight)
        .await?;

    if assignment.already_assigned && format == OutputFormat::Table {
        output::print_warning(&format!(
            "Booking {} was already checked in.",
            assignment.reference
        ));
    }

    output::print_row(
        &AssignmentRow {
            reference: assignment.reference,
            seat: assignment.seat_number,
            policy: assignment.policy.to_string(),
            already_assigned: assignment.already_assigned,
        },
        format,
    );
    Ok(())
}
