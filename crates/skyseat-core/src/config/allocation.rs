//! Allocation engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Tuning knobs for the seat allocation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Number of candidate seats the unsafe policy reads per attempt.
    #[serde(default = "default_candidate_window")]
    pub candidate_window: u32,
    /// Lower bound of the synthetic processing delay, in milliseconds.
    #[serde(default = "default_delay_min")]
    pub processing_delay_min_ms: u64,
    /// Upper bound of the synthetic processing delay, in milliseconds.
    ///
    /// Setting both bounds to zero disables the delay.
    #[serde(default = "default_delay_max")]
    pub processing_delay_max_ms: u64,
    /// Overall deadline for one allocation invocation, in milliseconds.
    #[serde(default = "default_deadline")]
    pub deadline_ms: u64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            candidate_window: default_candidate_window(),
            processing_delay_min_ms: default_delay_min(),
            processing_delay_max_ms: default_delay_max(),
            deadline_ms: default_deadline(),
        }
    }
}

impl AllocationConfig {
    /// A configuration with no processing delay, for deterministic runs.
    pub fn without_delay() -> Self {
        Self {
            processing_delay_min_ms: 0,
            processing_delay_max_ms: 0,
            ..Self::default()
        }
    }

    /// Check the invariants between fields.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.candidate_window == 0 {
            return Err(AppError::configuration(
                "allocation.candidate_window must be at least 1",
            ));
        }
        if self.deadline_ms == 0 {
            return Err(AppError::configuration(
                "allocation.deadline_ms must be greater than zero",
            ));
        }
        if self.processing_delay_min_ms > self.processing_delay_max_ms {
            return Err(AppError::configuration(format!(
                "allocation.processing_delay_min_ms ({}) exceeds processing_delay_max_ms ({})",
                self.processing_delay_min_ms, self.processing_delay_max_ms
            )));
        }
        Ok(())
    }

    /// The per-invocation deadline as a [`Duration`].
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

fn default_candidate_window() -> u32 {
    5
}

fn default_delay_min() -> u64 {
    10
}

fn default_delay_max() -> u64 {
    100
}

fn default_deadline() -> u64 {
    3000
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults_are_valid() {
        let config = AllocationConfig::default();
        assert_eq!(config.candidate_window, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_delay_bounds() {
        let config = AllocationConfig {
            processing_delay_min_ms: 50,
            processing_delay_max_ms: 10,
            ..AllocationConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_rejects_empty_window() {
        let config = AllocationConfig {
            candidate_window: 0,
            ..AllocationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
