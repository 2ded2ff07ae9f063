//! Allocation service: the entry point callers use for check-in.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use skyseat_core::config::AllocationConfig;
use skyseat_core::error::AppError;
use skyseat_core::result::AppResult;
use skyseat_core::types::FlightId;
use skyseat_entity::allocation::{AllocationPolicy, SeatAssignment};

use super::delay::ProcessingDelay;
use super::safe_policy::SafePolicy;
use super::unsafe_policy::UnsafePolicy;
use crate::store::SeatStore;

/// Maximum accepted length of a booking reference.
const MAX_REFERENCE_LEN: usize = 64;

/// Runs allocation policies under an overall deadline.
///
/// The service holds no mutable state of its own. Every invocation is an
/// independent unit of work against the shared store handle. It never
/// retries internally.
#[derive(Debug, Clone)]
pub struct AllocationService {
    unsafe_policy: UnsafePolicy,
    safe_policy: SafePolicy,
    deadline: Duration,
}

impl AllocationService {
    /// Creates a new allocation service.
    pub fn new(store: Arc<dyn SeatStore>, config: &AllocationConfig) -> Self {
        Self::with_delay(store, config, ProcessingDelay::from_config(config))
    }

    /// Creates a service with an explicit processing delay.
    pub fn with_delay(
        store: Arc<dyn SeatStore>,
        config: &AllocationConfig,
        delay: ProcessingDelay,
    ) -> Self {
        Self {
            unsafe_policy: UnsafePolicy::new(Arc::clone(&store), delay, config.candidate_window),
            safe_policy: SafePolicy::new(store, delay),
            deadline: config.deadline(),
        }
    }

    /// The per-invocation deadline.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Allocate with read-then-write semantics. Duplicate bindings are only
    /// stopped by the ledger's uniqueness constraint.
    pub async fn allocate_unsafe(
        &self,
        reference: &str,
        flight: Option<FlightId>,
    ) -> AppResult<SeatAssignment> {
        self.allocate(AllocationPolicy::Unsafe, reference, flight)
            .await
    }

    /// Allocate under a skip-locked row lock inside one transaction.
    pub async fn allocate_safe(
        &self,
        reference: &str,
        flight: Option<FlightId>,
    ) -> AppResult<SeatAssignment> {
        self.allocate(AllocationPolicy::Safe, reference, flight)
            .await
    }

    /// Allocate with the given policy.
    pub async fn allocate(
        &self,
        policy: AllocationPolicy,
        reference: &str,
        flight: Option<FlightId>,
    ) -> AppResult<SeatAssignment> {
        let reference = validate_reference(reference)?;

        let result = match policy {
            AllocationPolicy::Unsafe => {
                self.within_deadline(reference, policy, self.unsafe_policy.allocate(reference, flight))
                    .await
            }
            AllocationPolicy::Safe => {
                self.within_deadline(reference, policy, self.safe_policy.allocate(reference, flight))
                    .await
            }
        };

        match &result {
            Ok(assignment) if assignment.already_assigned => {
                info!(
                    reference = %reference,
                    seat = %assignment.seat_number,
                    policy = %policy,
                    "Booking already holds a seat"
                );
            }
            Ok(_) => {}
            Err(e) => {
                warn!(
                    reference = %reference,
                    policy = %policy,
                    kind = %e.kind,
                    retryable = e.is_retryable(),
                    error = %e,
                    "Seat allocation failed"
                );
            }
        }

        result
    }

    /// Drive `fut` to completion or fail with a timeout once the deadline
    /// elapses. The dropped future takes any open transaction with it, which
    /// rolls it back.
    async fn within_deadline<F>(
        &self,
        reference: &str,
        policy: AllocationPolicy,
        fut: F,
    ) -> AppResult<SeatAssignment>
    where
        F: Future<Output = AppResult<SeatAssignment>>,
    {
        match tokio::time::timeout(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::timeout(format!(
                "{policy} allocation for {reference} exceeded its {}ms deadline",
                self.deadline.as_millis()
            ))),
        }
    }
}

fn validate_reference(reference: &str) -> AppResult<&str> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(AppError::validation("Booking reference must not be empty"));
    }
    if reference.len() > MAX_REFERENCE_LEN {
        return Err(AppError::validation(format!(
            "Booking reference must be at most {MAX_REFERENCE_LEN} characters"
        )));
    }
    Ok(reference)
}
