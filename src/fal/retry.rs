//! Retry and backoff utilities for fal.ai API operations.
//!
//! This module provides functions for handling transient errors, rate limiting,
//! and exponential backoff.

use std::time::Duration;

/// Default number of retry attempts for rate-limited requests.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default number of retry attempts for transient network errors.
pub const DEFAULT_NETWORK_RETRIES: u32 = 3;

/// Base delay for exponential backoff (1 second).
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Maximum delay cap for exponential backoff (60 seconds).
pub const DEFAULT_BACKOFF_MAX: Duration = Duration::from_secs(60);

/// How often and how long to retry a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after transient network failures.
    pub network_retries: u32,
    /// Retries after 429 responses.
    pub rate_limit_retries: u32,
    /// First backoff delay; doubles on every attempt.
    pub backoff_base: Duration,
    /// Upper bound for any single delay, including `Retry-After`.
    pub backoff_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            network_retries: DEFAULT_NETWORK_RETRIES,
            rate_limit_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
            backoff_max: DEFAULT_BACKOFF_MAX,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            network_retries: 0,
            rate_limit_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.backoff_base, self.backoff_max)
    }

    /// Delay before retrying a rate-limited request. A server-provided
    /// `Retry-After` wins over the computed backoff but is still capped.
    pub fn rate_limit_delay(&self, attempt: u32, retry_after_secs: Option<u64>) -> Duration {
        match retry_after_secs {
            Some(secs) => Duration::from_secs(secs).min(self.backoff_max),
            None => self.backoff(attempt),
        }
    }
}

/// Determine if a reqwest error is a transient network error that should be retried.
///
/// Returns true for connection errors, timeouts, interrupted bodies and
/// 502/503/504 gateway responses.
pub fn is_transient_network_error(error: &reqwest::Error) -> bool {
    if error.is_connect() || error.is_timeout() || error.is_body() {
        return true;
    }

    matches!(
        error.status().map(|s| s.as_u16()),
        Some(502) | Some(503) | Some(504)
    )
}

/// Parse the Retry-After header value to get retry delay in seconds.
///
/// Only the integer seconds format is understood; HTTP dates yield `None`.
pub fn parse_retry_after(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}

/// Calculate exponential backoff delay.
///
/// min(base * 2^attempt, max)
pub fn calculate_backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt)).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_backoff_doubles() {
        let base = Duration::from_secs(1);
        let max = Duration::from_secs(60);
        assert_eq!(calculate_backoff(0, base, max), Duration::from_secs(1));
        assert_eq!(calculate_backoff(1, base, max), Duration::from_secs(2));
        assert_eq!(calculate_backoff(2, base, max), Duration::from_secs(4));
    }

    #[test]
    fn test_calculate_backoff_respects_max() {
        let delay = calculate_backoff(10, Duration::from_secs(1), Duration::from_secs(60));
        assert_eq!(delay, Duration::from_secs(60));
    }

    #[test]
    fn test_calculate_backoff_huge_attempt_saturates() {
        let delay = calculate_backoff(u32::MAX, Duration::from_secs(1), Duration::from_secs(5));
        assert_eq!(delay, Duration::from_secs(5));
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.network_retries, 3);
        assert_eq!(policy.rate_limit_retries, 5);
        assert_eq!(policy.backoff_base, Duration::from_secs(1));
        assert_eq!(policy.backoff_max, Duration::from_secs(60));
    }

    #[test]
    fn test_none_policy_has_no_retries() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.network_retries, 0);
        assert_eq!(policy.rate_limit_retries, 0);
    }

    #[test]
    fn test_rate_limit_delay_prefers_retry_after() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.rate_limit_delay(0, Some(7)), Duration::from_secs(7));
        assert_eq!(policy.rate_limit_delay(0, Some(600)), Duration::from_secs(60));
        assert_eq!(policy.rate_limit_delay(1, None), Duration::from_secs(2));
    }
}
