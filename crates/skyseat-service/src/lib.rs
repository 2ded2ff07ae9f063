//! # skyseat-service
//!
//! The seat allocation engine. Two concurrency-control policies bind one
//! available seat to one booking:
//!
//! - [`allocation::UnsafePolicy`] reads candidates, re-checks, then writes,
//!   without isolation. It exists to make the race observable.
//! - [`allocation::SafePolicy`] locks the next available seat with a
//!   skip-locked select inside one transaction, so no two requests can ever
//!   bind the same seat.
//!
//! Storage is reached only through the [`store::SeatStore`] seam, which has a
//! PostgreSQL implementation and an in-process one. Services follow
//! constructor injection: the store handle is passed in, never global.

pub mod admin;
pub mod allocation;
pub mod store;

pub use admin::AdminService;
pub use allocation::{AllocationService, LedgerBinder, ProcessingDelay, SafePolicy, UnsafePolicy};
pub use store::{MemorySeatStore, PgSeatStore, SeatStore, SeatTransaction};
