//! Allocation outcome value objects.

pub mod assignment;
pub mod policy;

pub use assignment::{PoolStatus, ResetSummary, SeatAssignment};
pub use policy::AllocationPolicy;
