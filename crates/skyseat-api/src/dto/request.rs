//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use skyseat_core::types::FlightId;

/// Check-in request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckinRequest {
    /// Booking reference (reservation code).
    #[validate(length(min = 1, max = 64, message = "Reference must be 1-64 characters"))]
    pub reference: String,
    /// Flight to allocate on. Defaults to the booking's flight.
    #[serde(default)]
    pub flight_id: Option<FlightId>,
}
