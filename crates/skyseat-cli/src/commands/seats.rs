//! Seat map command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use skyseat_core::config::AppConfig;
use skyseat_core::error::AppError;
use skyseat_core::types::FlightId;
use skyseat_service::AdminService;

use crate::output::{self, OutputFormat};

/// Arguments for the seats command
#[derive(Debug, Args)]
pub struct SeatsArgs {
    /// Flight ID
    #[arg(long)]
    pub flight: FlightId,

    /// Only show available seats
    #[arg(long)]
    pub available: bool,
}

#[derive(Serialize, Tabled)]
struct SeatRow {
    seat: String,
    position: i32,
    class: String,
    price: String,
    available: bool,
}

/// Execute the seats command
pub async fn execute(
    args: &SeatsArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let admin = AdminService::new(super::open_store(config).await?);
    let rows: Vec<SeatRow> = admin
        .list_seats(args.flight)
        .await?
        .into_iter()
        .filter(|s| !args.available || s.is_available)
        .map(|s| SeatRow {
            seat: s.seat_number,
            position: s.position,
            class: s.seat_class.to_string(),
            price: format!("{}.{:02}", s.price_cents / 100, s.price_cents % 100),
            available: s.is_available,
        })
        .collect();

    output::print_list(&rows, format);
    Ok(())
}
