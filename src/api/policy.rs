//! Timeout and retry policy applied to every backend request.
//!
//! The default policy is a single attempt with no timeout: requests are
//! one-shot unless the caller opts in to retries.

use std::time::Duration;

use rand::Rng;

/// Bounded retry with exponential backoff and jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first (>= 1).
    pub max_attempts: u32,
    /// Delay before the first retry (ms).
    pub base_delay_ms: u64,
    /// Multiplier applied per retry.
    pub factor: f64,
    /// Upper bound on the delay before jitter (ms).
    pub max_delay_ms: u64,
    /// Jitter as a fraction of the delay (0.0 to 1.0).
    pub jitter_percent: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 100,
            factor: 2.0,
            max_delay_ms: 5000,
            jitter_percent: 0.2,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns `true` if another attempt is allowed after `attempt`
    /// (zero-based) failed.
    pub fn allows_retry(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }

    /// Delay before the retry that follows `attempt` (zero-based).
    ///
    /// `min(base * factor^attempt, max)` with `±jitter_percent` applied.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = i32::try_from(attempt).unwrap_or(i32::MAX);
        let base = (self.base_delay_ms as f64 * self.factor.powi(exp)).min(self.max_delay_ms as f64);

        let jitter_range = base * self.jitter_percent;
        let jitter = if jitter_range > 0.0 {
            rand::rng().random_range(-jitter_range..=jitter_range)
        } else {
            0.0
        };

        Duration::from_millis((base + jitter).max(0.0) as u64)
    }
}

/// Per-request timeout plus retry policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestPolicy {
    /// Bound on each attempt, covering send and body read. `None` waits forever.
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

impl RequestPolicy {
    /// Timeout in whole milliseconds, for error reporting.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.map_or(0, whole_millis)
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub(crate) fn whole_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_millis_saturates() {
        assert_eq!(whole_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(whole_millis(Duration::from_micros(999)), 0);
        assert_eq!(whole_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn default_is_single_attempt() {
        let policy = RequestPolicy::default();
        assert!(policy.timeout.is_none());
        assert!(!policy.retry.allows_retry(0));
    }

    #[test]
    fn allows_retry_until_max_attempts() {
        let retry = RetryPolicy {
            max_attempts: 3,
            ..RetryPolicy::default()
        };
        assert!(retry.allows_retry(0));
        assert!(retry.allows_retry(1));
        assert!(!retry.allows_retry(2));
    }

    #[test]
    fn backoff_grows_without_jitter() {
        let retry = RetryPolicy {
            max_attempts: 5,
            base_delay_ms: 100,
            factor: 2.0,
            max_delay_ms: 1000,
            jitter_percent: 0.0,
        };
        assert_eq!(retry.backoff(0), Duration::from_millis(100));
        assert_eq!(retry.backoff(1), Duration::from_millis(200));
        assert_eq!(retry.backoff(2), Duration::from_millis(400));
        // capped
        assert_eq!(retry.backoff(6), Duration::from_millis(1000));
    }

    #[test]
    fn backoff_jitter_stays_in_band() {
        let retry = RetryPolicy {
            max_attempts: 5,
            base_delay_ms: 100,
            factor: 2.0,
            max_delay_ms: 5000,
            jitter_percent: 0.2,
        };
        for _ in 0..100 {
            let ms = retry.backoff(1).as_millis();
            assert!((160..=240).contains(&ms), "backoff {ms} ms outside ±20% of 200");
        }
    }
}
