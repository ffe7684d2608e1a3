use common::BackoffPolicy;
use std::time::Duration;

/// How many times a failed request is re-sent, and how long to wait between tries.
///
/// `retries` counts extra attempts: a request is sent at most `retries + 1` times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub backoff: BackoffPolicy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            backoff: BackoffPolicy::default(),
        }
    }
}

impl RetryPolicy {
    /// Send once, never retry.
    pub fn none() -> Self {
        Self {
            retries: 0,
            backoff: BackoffPolicy::default(),
        }
    }

    /// `retries` extra attempts separated by a constant `delay`.
    pub fn fixed(retries: u32, delay: Duration) -> Self {
        Self {
            retries,
            backoff: BackoffPolicy::fixed(delay),
        }
    }

    /// Total number of attempts this policy allows.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}
