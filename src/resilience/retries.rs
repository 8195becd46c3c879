//! Retry policy for status failures.
//!
//! A fetch is retried while the server answers with anything other than
//! 200. The policy decides whether another attempt is allowed and how long
//! to wait before it.

use std::time::Duration;
use crate::config::RetryConfig;
use crate::resilience::backoff::calculate_backoff;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total requests allowed per fetch; `None` retries forever.
    pub max_attempts: Option<u32>,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Retry forever with no delay between attempts.
    ///
    /// A permanently failing URL (a 404, say) is requested in a hot loop
    /// until the caller drops the future.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn bounded(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            base_delay,
            max_delay,
        }
    }

    /// Delay before the attempt following `attempt` (1-based), or `None`
    /// once the budget is spent.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if let Some(max) = self.max_attempts {
            if attempt >= max {
                return None;
            }
        }

        Some(calculate_backoff(
            attempt,
            ceil_millis(self.base_delay),
            ceil_millis(self.max_delay),
        ))
    }
}

/// Whole milliseconds, rounding up so a non-zero delay never becomes zero.
fn ceil_millis(delay: Duration) -> u64 {
    let millis = delay.as_micros().div_ceil(1000);
    u64::try_from(millis).unwrap_or(u64::MAX)
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: (config.max_attempts > 0).then_some(config.max_attempts),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}
