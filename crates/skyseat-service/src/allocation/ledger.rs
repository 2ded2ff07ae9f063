//! Reservation ledger binding shared by both allocation policies.

use tracing::warn;

use skyseat_core::error::{AppError, ErrorKind};
use skyseat_core::result::AppResult;
use skyseat_core::types::SeatId;
use skyseat_entity::booking::Booking;

use crate::store::{SeatStore, SeatTransaction};

/// Writes a seat binding into a booking.
///
/// An unknown reference is an error, never a silent no-op. A seat already
/// bound elsewhere is rejected by the store's uniqueness constraint and
/// surfaces as [`ErrorKind::ConstraintViolation`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerBinder;

impl LedgerBinder {
    /// Bind as a single statement, outside any transaction.
    pub async fn bind(
        store: &dyn SeatStore,
        reference: &str,
        seat_id: SeatId,
    ) -> AppResult<Booking> {
        let result = store.bind_seat(reference, seat_id).await;
        Self::finish(result, reference, seat_id)
    }

    /// Bind inside the caller's transaction.
    pub async fn bind_in(
        tx: &mut dyn SeatTransaction,
        reference: &str,
        seat_id: SeatId,
    ) -> AppResult<Booking> {
        let result = tx.bind_seat(reference, seat_id).await;
        Self::finish(result, reference, seat_id)
    }

    fn finish(
        result: AppResult<Option<Booking>>,
        reference: &str,
        seat_id: SeatId,
    ) -> AppResult<Booking> {
        match result {
            Ok(Some(booking)) => Ok(booking),
            Ok(None) => Err(AppError::unknown_requester(reference)),
            Err(e) if e.kind == ErrorKind::ConstraintViolation => {
                warn!(
                    reference = %reference,
                    seat_id = %seat_id,
                    error = %e,
                    "Ledger rejected duplicate seat binding"
                );
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}
