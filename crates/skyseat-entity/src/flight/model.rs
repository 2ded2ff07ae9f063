//! Flight entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use skyseat_core::types::FlightId;

/// A scheduled flight. Each flight scopes one pool of seats.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Flight {
    /// Unique flight identifier.
    pub id: FlightId,
    /// Marketing flight number (e.g. `"SK1042"`).
    pub flight_number: String,
    /// Origin airport code.
    pub origin: String,
    /// Destination airport code.
    pub destination: String,
    /// Scheduled departure time.
    pub departs_at: DateTime<Utc>,
}
