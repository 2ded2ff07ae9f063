//! # skyseat-entity
//!
//! Domain entity models for SkySeat. Every struct in this crate represents
//! a database table row or a domain value object. Database entities derive
//! `sqlx::FromRow`.

pub mod allocation;
pub mod booking;
pub mod flight;
pub mod seat;
