//! Polling configuration.

use std::time::Duration;

/// Configuration for the page polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Consecutive failed fetches after which polling gives up.
    pub max_retries: u32,

    /// Back-off after the first failure; doubles with each further one.
    pub base_delay: Duration,
}

impl PollConfig {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before retrying after `error_count` consecutive failures:
    /// `base_delay * 2^(error_count - 1)`.
    ///
    /// Zero failures means no delay. Saturates rather than overflowing.
    pub fn retry_delay(&self, error_count: u32) -> Duration {
        if error_count == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(error_count - 1).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(1000),
        }
    }
}
