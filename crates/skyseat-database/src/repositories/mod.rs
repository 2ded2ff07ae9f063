//! Repository implementations for SkySeat entities.

pub mod booking;
pub mod flight;
pub mod seat;

pub use booking::BookingRepository;
pub use flight::FlightRepository;
pub use seat::SeatRepository;
