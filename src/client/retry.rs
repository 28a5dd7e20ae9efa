//! Backoff policy and the sleep seam used between attempts.

use std::time::Duration;

use rand::Rng;

use super::http_transport::BoxFuture;

/// Exponential backoff with additive jitter.
///
/// The delay before retry `n` (0-indexed) is
/// `min(base_delay * 2^n + jitter, max_delay)` with `jitter` drawn uniformly
/// from `[0, max_jitter)`.
///
/// # Defaults
///
/// - `base_delay`: 1 second
/// - `max_jitter`: 500 ms
/// - `max_delay`: 30 seconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    /// Upper bound (exclusive) of the random jitter. Zero disables jitter.
    pub max_jitter: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
    pub const DEFAULT_MAX_JITTER: Duration = Duration::from_millis(500);
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

    pub const fn new() -> Self {
        Self {
            base_delay: Self::DEFAULT_BASE_DELAY,
            max_jitter: Self::DEFAULT_MAX_JITTER,
            max_delay: Self::DEFAULT_MAX_DELAY,
        }
    }

    #[must_use]
    pub const fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the jitter bound. `Duration::ZERO` makes delays deterministic.
    #[must_use]
    pub const fn with_max_jitter(mut self, jitter: Duration) -> Self {
        self.max_jitter = jitter;
        self
    }

    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Delay before retry `retry` given an already-sampled jitter.
    pub fn delay_for_retry(&self, retry: u32, jitter: Duration) -> Duration {
        let factor = 2_u32.saturating_pow(retry);
        self.base_delay
            .saturating_mul(factor)
            .saturating_add(jitter)
            .min(self.max_delay)
    }

    /// Delay before retry `retry` with freshly sampled jitter.
    pub fn backoff(&self, retry: u32) -> Duration {
        self.delay_for_retry(retry, self.sample_jitter())
    }

    fn sample_jitter(&self) -> Duration {
        if self.max_jitter.is_zero() {
            return Duration::ZERO;
        }
        let bound = u64::try_from(self.max_jitter.as_micros()).unwrap_or(u64::MAX);
        Duration::from_micros(rand::rng().random_range(0..bound))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Sleeps between retry attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}
