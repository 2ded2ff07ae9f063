//! Seat domain entities.

pub mod class;
pub mod model;

pub use class::SeatClass;
pub use model::Seat;
