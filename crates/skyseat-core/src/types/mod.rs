//! Shared value types.

pub mod id;

pub use id::{BookingId, FlightId, PassengerId, SeatId};
