//! Unified application error types for SkySeat.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. The allocation failure taxonomy
//! lives directly in [`ErrorKind`] so that callers can branch on the kind
//! without downcasting.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// No ledger entry exists for the given requester reference.
    UnknownRequester,
    /// No available seat was found in the pool at query time.
    PoolExhausted,
    /// Every candidate examined by the unsafe policy was lost to a concurrent requester.
    ExhaustedCandidates,
    /// The invocation deadline elapsed before commit.
    Timeout,
    /// The ledger uniqueness constraint rejected a binding.
    ConstraintViolation,
    /// The requested record was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// A row needed by this request is held by a concurrent request.
    Conflict,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether a caller may retry the same request and reasonably expect success.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::PoolExhausted | Self::ExhaustedCandidates | Self::Timeout | Self::Conflict
        )
    }

    /// Return the kind as a stable machine-readable code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownRequester => "UNKNOWN_REQUESTER",
            Self::PoolExhausted => "POOL_EXHAUSTED",
            Self::ExhaustedCandidates => "EXHAUSTED_CANDIDATES",
            Self::Timeout => "TIMEOUT",
            Self::ConstraintViolation => "CONSTRAINT_VIOLATION",
            Self::NotFound => "NOT_FOUND",
            Self::Validation => "VALIDATION",
            Self::Conflict => "CONFLICT",
            Self::Database => "DATABASE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unified application error used throughout SkySeat.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unknown-requester error for the given reference code.
    pub fn unknown_requester(reference: &str) -> Self {
        Self::new(
            ErrorKind::UnknownRequester,
            format!("No booking found for reference '{reference}'"),
        )
    }

    /// Create a pool-exhausted error.
    pub fn pool_exhausted(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PoolExhausted, message)
    }

    /// Create an exhausted-candidates error.
    pub fn exhausted_candidates(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExhaustedCandidates, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create a constraint-violation error.
    pub fn constraint_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConstraintViolation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
