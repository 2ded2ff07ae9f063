//! Route handlers organized by domain.

pub mod admin;
pub mod checkin;
pub mod flight;
pub mod health;
