//! Seat entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use skyseat_core::types::{FlightId, SeatId};

use super::class::SeatClass;

/// One allocatable seat on a flight.
///
/// `is_available` is `false` exactly when a booking references this seat.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Seat {
    /// Unique seat identifier.
    pub id: SeatId,
    /// Flight (pool) this seat belongs to.
    pub flight_id: FlightId,
    /// Printed seat label, unique within the flight (e.g. `"12C"`).
    pub seat_number: String,
    /// Ordering key. Lower positions are allocated first.
    pub position: i32,
    /// Cabin class.
    pub seat_class: SeatClass,
    /// Price in minor currency units. Not interpreted by the engine.
    pub price_cents: i64,
    /// Whether the seat can still be allocated.
    pub is_available: bool,
    /// When the row was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Seat {
    /// Sort key shared by every allocation query: position, then label.
    ///
    /// Labels compare byte-wise. `seats.seat_number` is declared with the
    /// `"C"` collation so PostgreSQL breaks ties the same way.
    pub fn ordering_key(&self) -> (i32, &str) {
        (self.position, self.seat_number.as_str())
    }
}
