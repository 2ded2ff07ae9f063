//! Synthetic processing delay applied between choosing and binding a seat.

use std::time::Duration;

use skyseat_core::config::AllocationConfig;

/// A bounded random pause standing in for real per-request work.
///
/// It widens the window between reading and writing a seat. Zero disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingDelay {
    min_ms: u64,
    max_ms: u64,
}

impl ProcessingDelay {
    /// No delay at all.
    pub fn none() -> Self {
        Self::between(Duration::ZERO, Duration::ZERO)
    }

    /// Always pause for exactly `duration`.
    pub fn fixed(duration: Duration) -> Self {
        Self::between(duration, duration)
    }

    /// Pause for a uniformly random duration in `[min, max]`.
    ///
    /// Bounds given in the wrong order are swapped.
    pub fn between(min: Duration, max: Duration) -> Self {
        let (a, b) = (min.as_millis() as u64, max.as_millis() as u64);
        Self {
            min_ms: a.min(b),
            max_ms: a.max(b),
        }
    }

    /// Build from the allocation configuration.
    pub fn from_config(config: &AllocationConfig) -> Self {
        Self::between(
            Duration::from_millis(config.processing_delay_min_ms),
            Duration::from_millis(config.processing_delay_max_ms),
        )
    }

    /// Whether this delay never pauses.
    pub fn is_disabled(&self) -> bool {
        self.max_ms == 0
    }

    /// Draw one pause length.
    pub fn sample(&self) -> Duration {
        if self.min_ms == self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rand::random_range(self.min_ms..=self.max_ms))
    }

    /// Sleep for one sampled duration.
    pub async fn pause(&self) {
        if self.is_disabled() {
            return;
        }
        let duration = self.sample();
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

impl Default for ProcessingDelay {
    fn default() -> Self {
        Self::from_config(&AllocationConfig::default())
    }
}
