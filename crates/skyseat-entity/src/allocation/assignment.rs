//! Seat assignment, pool status, and reset summary value objects.

use serde::{Deserialize, Serialize};

use skyseat_core::types::{FlightId, SeatId};

use super::policy::AllocationPolicy;
use crate::booking::Booking;
use crate::seat::Seat;

/// The seat bound to a requester by a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAssignment {
    /// Booking reference the seat is bound to.
    pub reference: String,
    /// Flight the seat belongs to.
    pub flight_id: FlightId,
    /// Bound seat identifier.
    pub seat_id: SeatId,
    /// Printed seat label.
    pub seat_number: String,
    /// Policy that produced (or found) the binding.
    pub policy: AllocationPolicy,
    /// `true` when the booking already held this seat and nothing changed.
    pub already_assigned: bool,
}

impl SeatAssignment {
    /// Build an assignment for a freshly bound seat.
    pub fn bound(booking: &Booking, seat: &Seat, policy: AllocationPolicy) -> Self {
        Self {
            reference: booking.reference.clone(),
            flight_id: seat.flight_id,
            seat_id: seat.id,
            seat_number: seat.seat_number.clone(),
            policy,
            already_assigned: false,
        }
    }

    /// Build an assignment describing a seat the booking already held.
    pub fn existing(booking: &Booking, seat: &Seat, policy: AllocationPolicy) -> Self {
        Self {
            already_assigned: true,
            ..Self::bound(booking, seat, policy)
        }
    }
}

/// Seat counts for one flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Flight the counts belong to.
    pub flight_id: FlightId,
    /// Total seats on the flight.
    pub total: u64,
    /// Seats still available.
    pub available: u64,
    /// Seats bound to a booking.
    pub assigned: u64,
}

/// Row counts touched by an administrative reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetSummary {
    /// Seats flipped back to available.
    pub seats_released: u64,
    /// Bookings whose binding was cleared.
    pub bookings_cleared: u64,
}
