//! Booking entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use skyseat_core::types::{BookingId, FlightId, PassengerId, SeatId};

/// A reservation ledger entry binding at most one seat to a passenger.
///
/// Rows are provisioned unbound before check-in is possible and are never
/// deleted. `seat_id` is unique across all bookings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: BookingId,
    /// External reservation code used to look the booking up.
    pub reference: String,
    /// Passenger holding the booking.
    pub passenger_id: PassengerId,
    /// Flight the booking is for.
    pub flight_id: FlightId,
    /// Bound seat, if any.
    pub seat_id: Option<SeatId>,
    /// Whether the passenger has checked in (a seat is bound).
    pub checked_in: bool,
    /// When the seat was bound.
    pub checked_in_at: Option<DateTime<Utc>>,
    /// When the row was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// The bound seat, if this booking is checked in.
    pub fn bound_seat(&self) -> Option<SeatId> {
        if self.checked_in { self.seat_id } else { None }
    }
}
