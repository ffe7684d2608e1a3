use rand::Rng;
use std::time::Duration;

/// Backoff parameters shared by every retrying caller.
///
/// Delay for attempt `n` (zero-based) is `min(max_delay, base * 2^n)`, spread
/// by `jitter_factor` in both directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub max_delay: Duration,
    pub jitter_factor: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(1_000),
            max_delay: Duration::from_secs(30),
            jitter_factor: 0.0,
        }
    }
}

impl BackoffPolicy {
    /// Fixed delay between attempts (no doubling, no jitter).
    pub fn fixed(delay: Duration) -> Self {
        Self {
            base: delay,
            max_delay: delay,
            jitter_factor: 0.0,
        }
    }

    /// Start a fresh backoff sequence.
    pub fn start(&self) -> ExponentialBackoff {
        ExponentialBackoff::new(self.base, self.max_delay, self.jitter_factor)
    }
}

/// Exponential backoff with jitter.
///
/// Formula: min(max_delay, base * 2^attempt) + random_jitter
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    base: Duration,
    max_delay: Duration,
    jitter_factor: f64,
    attempt: u32,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        BackoffPolicy::default().start()
    }
}

impl ExponentialBackoff {
    /// Create a new ExponentialBackoff.
    ///
    /// # Arguments
    /// * `base` - Initial delay duration
    /// * `max_delay` - Maximum delay cap
    /// * `jitter_factor` - Jitter as a fraction of delay (0.0 to 1.0). Negative values are clamped to 0.
    pub fn new(base: Duration, max_delay: Duration, jitter_factor: f64) -> Self {
        Self {
            base,
            max_delay,
            // Negative ranges would panic in gen_range
            jitter_factor: jitter_factor.max(0.0),
            attempt: 0,
        }
    }

    /// Calculate the next delay and increment the attempt counter.
    pub fn next_delay(&mut self) -> Duration {
        let exp_delay = self.base.saturating_mul(2u32.saturating_pow(self.attempt));
        let capped_delay = exp_delay.min(self.max_delay);

        let jitter_range = capped_delay.as_secs_f64() * self.jitter_factor;
        let jitter = if jitter_range > 0.0 {
            rand::thread_rng().gen_range(-jitter_range..=jitter_range)
        } else {
            0.0
        };
        let final_secs = (capped_delay.as_secs_f64() + jitter).max(0.0);

        self.attempt = self.attempt.saturating_add(1);

        Duration::from_secs_f64(final_secs)
    }

    /// Number of delays handed out so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        let mut backoff = BackoffPolicy {
            base: Duration::from_millis(100),
            max_delay: Duration::from_secs(60),
            jitter_factor: 0.0,
        }
        .start();

        assert_eq!(backoff.next_delay(), Duration::from_millis(100));
        assert_eq!(backoff.next_delay(), Duration::from_millis(200));
        assert_eq!(backoff.next_delay(), Duration::from_millis(400));
        assert_eq!(backoff.attempt(), 3);
    }

    #[test]
    fn test_backoff_caps_at_max() {
        let mut backoff =
            ExponentialBackoff::new(Duration::from_secs(1), Duration::from_secs(10), 0.0);

        for _ in 0..10 {
            backoff.next_delay();
        }

        assert_eq!(backoff.next_delay(), Duration::from_secs(10));
    }

    #[test]
    fn test_fixed_policy_never_grows() {
        let mut backoff = BackoffPolicy::fixed(Duration::from_millis(250)).start();
        for _ in 0..5 {
            assert_eq!(backoff.next_delay(), Duration::from_millis(250));
        }
    }

    #[test]
    fn test_backoff_with_jitter_stays_in_bounds() {
        let mut backoff = ExponentialBackoff::new(
            Duration::from_secs(10),
            Duration::from_secs(60),
            0.2,
        );

        let secs = backoff.next_delay().as_secs_f64();
        assert!((8.0..=12.0).contains(&secs), "delay was {}", secs);
    }

    #[test]
    fn test_negative_jitter_clamped() {
        let mut backoff =
            ExponentialBackoff::new(Duration::from_secs(1), Duration::from_secs(60), -0.5);
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
    }
}
