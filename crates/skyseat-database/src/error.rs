//! Classification of sqlx errors into application error kinds.

use skyseat_core::error::{AppError, ErrorKind};

/// SQLSTATE raised by `FOR UPDATE NOWAIT` when the row is already locked.
const LOCK_NOT_AVAILABLE: &str = "55P03";

/// Map a sqlx error into an [`AppError`], preserving the kinds the
/// allocation engine branches on.
///
/// Unique violations become [`ErrorKind::ConstraintViolation`] and lock
/// contention on a `NOWAIT` select becomes [`ErrorKind::Conflict`].
/// Everything else is [`ErrorKind::Database`].
pub fn map_sqlx_error(context: &str, err: sqlx::Error) -> AppError {
    let classified = err.as_database_error().and_then(|db| {
        if db.is_unique_violation() {
            Some((ErrorKind::ConstraintViolation, db.message().to_string()))
        } else if db.code().as_deref() == Some(LOCK_NOT_AVAILABLE) {
            Some((ErrorKind::Conflict, db.message().to_string()))
        } else {
            None
        }
    });

    match classified {
        Some((kind, detail)) => AppError::with_source(kind, format!("{context}: {detail}"), err),
        None => AppError::with_source(ErrorKind::Database, context, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_map_to_database_kind() {
        let err = map_sqlx_error("Failed to find seat", sqlx::Error::RowNotFound);
        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(err.message, "Failed to find seat");
        assert!(err.source.is_some());
    }

    #[test]
    fn test_pool_timeout_maps_to_database_kind() {
        let err = map_sqlx_error("Failed to begin", sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind, ErrorKind::Database);
    }
}
