//! Flight listing command.

use serde::Serialize;
use tabled::Tabled;

use skyseat_core::config::AppConfig;
use skyseat_core::error::AppError;
use skyseat_service::AdminService;

use crate::output::{self, OutputFormat};

#[derive(Serialize, Tabled)]
struct FlightRow {
    id: String,
    flight: String,
    route: String,
    departs: String,
}

/// Execute the flights command
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let admin = AdminService::new(super::open_store(config).await?);
    let rows: Vec<FlightRow> = admin
        .list_flights()
        .await?
        .into_iter()
        .map(|f| FlightRow {
            id: f.id.to_string(),
            flight: f.flight_number,
            route: format!("{} -> {}", f.origin, f.destination),
            departs: f.departs_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        })
        .collect();

    output::print_list(&rows, format);
    Ok(())
}
