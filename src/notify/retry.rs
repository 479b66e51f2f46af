//! Backoff schedule for Slack delivery.

use std::time::Duration;

use crate::config::defaults;

/// How often a Slack post is attempted and how long to wait in between.
///
/// Waits grow geometrically from `initial_delay` by `multiplier` and never
/// exceed `max_delay`. Email is not retried within a run, so only
/// [`SlackNotifier`](super::SlackNotifier) consults this.
///
/// Config validation guarantees `max_attempts >= 1`, a positive finite
/// `multiplier` and `max_delay >= initial_delay`.
///
/// ```
/// use interface_notifier::notify::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy {
///     max_attempts: 3,
///     initial_delay: Duration::from_secs(1),
///     max_delay: Duration::from_secs(10),
///     multiplier: 1.5,
/// };
/// assert_eq!(policy.backoff_before(2), Some(Duration::from_secs(1)));
/// assert_eq!(policy.backoff_before(3), Some(Duration::from_millis(1500)));
/// assert_eq!(policy.backoff_before(4), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per notification, the first one included.
    pub max_attempts: u32,
    /// Wait before the second attempt.
    pub initial_delay: Duration,
    /// Cap on any single wait.
    pub max_delay: Duration,
    /// Growth factor between consecutive waits.
    pub multiplier: f64,
}

impl RetryPolicy {
    /// A policy that posts once and gives up.
    #[must_use]
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Wait before attempt number `next` (1-based), or `None` when the
    /// attempt budget is spent.
    ///
    /// The first attempt never waits.
    #[must_use]
    pub fn backoff_before(&self, next: u32) -> Option<Duration> {
        if next > self.max_attempts {
            return None;
        }
        let Some(retries) = next.checked_sub(2) else {
            return Some(Duration::ZERO);
        };
        let exponent = i32::try_from(retries).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        Some(Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64())))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::RETRY_MAX_ATTEMPTS,
            initial_delay: Duration::from_secs(defaults::RETRY_INITIAL_DELAY_SECS),
            max_delay: Duration::from_secs(defaults::RETRY_MAX_DELAY_SECS),
            multiplier: defaults::RETRY_MULTIPLIER,
        }
    }
}
