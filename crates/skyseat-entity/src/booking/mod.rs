//! Booking (reservation ledger) entities.

pub mod model;

pub use model::Booking;
