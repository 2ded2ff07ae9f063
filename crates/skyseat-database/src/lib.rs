//! # skyseat-database
//!
//! PostgreSQL connection management and concrete repository implementations
//! for flights, seats, and bookings.
//!
//! Repositories expose pool-level methods for plain reads and writes, and
//! associated functions taking a `&mut PgConnection` for statements that must
//! run inside a caller-owned transaction.

pub mod connection;
pub mod error;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use error::map_sqlx_error;
