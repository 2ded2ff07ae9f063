//! Response DTOs.

use serde::{Deserialize, Serialize};

use skyseat_core::types::{FlightId, SeatId};
use skyseat_entity::seat::{Seat, SeatClass};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// One seat in a flight's seat map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatResponse {
    /// Seat ID.
    pub id: SeatId,
    /// Seat label.
    pub seat_number: String,
    /// Allocation order.
    pub position: i32,
    /// Cabin class.
    pub seat_class: SeatClass,
    /// Price in cents.
    pub price_cents: i64,
    /// Availability.
    pub is_available: bool,
}

impl From<Seat> for SeatResponse {
    fn from(seat: Seat) -> Self {
        Self {
            id: seat.id,
            seat_number: seat.seat_number,
            position: seat.position,
            seat_class: seat.seat_class,
            price_cents: seat.price_cents,
            is_available: seat.is_available,
        }
    }
}

/// Seat map for a flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatMapResponse {
    /// Flight ID.
    pub flight_id: FlightId,
    /// Seats in allocation order.
    pub seats: Vec<SeatResponse>,
}

/// Result of releasing a booking's seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseResponse {
    /// Booking reference.
    pub reference: String,
    /// Seat that was freed, if the booking held one.
    pub released_seat_id: Option<SeatId>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime.
    pub uptime_seconds: u64,
    /// Seat store status.
    pub store: String,
}
