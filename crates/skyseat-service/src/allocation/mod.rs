//! Seat allocation policies and the service that runs them.

pub mod delay;
pub mod ledger;
pub mod safe_policy;
pub mod service;
pub mod unsafe_policy;

pub use delay::ProcessingDelay;
pub use ledger::LedgerBinder;
pub use safe_policy::SafePolicy;
pub use service::AllocationService;
pub use unsafe_policy::UnsafePolicy;
