// Retry with exponential backoff and jitter.
//
// `RequestExecutor` wraps a single logical request: every attempt runs
// under the same wall-clock budget, failures are classified through
// `Error::is_retryable`, and transient ones are retried after a growing,
// jittered delay.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::Error;
use crate::transport::DEFAULT_TIMEOUT;

/// No retry sleep is ever shorter than this, whatever the jitter rolls.
pub const MIN_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Backoff parameters for [`RequestExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Cap applied before jitter.
    pub max_delay: Duration,
    /// Jitter is drawn uniformly from `[-jitter, +jitter]`.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(16),
            jitter: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Tighter schedule used by [`MeshClient`](crate::MeshClient): 0.5s, 1s,
    /// 2s, 4s, 4s. Interactive commands should not stall for long.
    pub fn api_default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(4),
            jitter: Duration::from_millis(500),
        }
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Un-jittered delay before retry number `attempt` (1-based):
    /// `min(base * 2^(attempt-1), max)`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(1_u32 << exp)
            .min(self.max_delay)
    }

    /// Apply a jitter sample in `[-1.0, 1.0]` to the backoff for `attempt`,
    /// flooring the result at [`MIN_RETRY_DELAY`].
    pub fn delay_with_jitter(&self, attempt: u32, sample: f64) -> Duration {
        let secs = self.backoff(attempt).as_secs_f64() + sample * self.jitter.as_secs_f64();
        if secs.is_nan() || secs <= MIN_RETRY_DELAY.as_secs_f64() {
            return MIN_RETRY_DELAY;
        }
        Duration::from_secs_f64(secs)
    }

    fn next_delay(&self, attempt: u32) -> Duration {
        let sample = (rand::random::<f64>() - 0.5) * 2.0;
        self.delay_with_jitter(attempt, sample)
    }
}

/// Runs one logical request with a timeout and retry policy.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    policy: RetryPolicy,
    default_timeout: Duration,
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new(RetryPolicy::default(), DEFAULT_TIMEOUT)
    }
}

impl RequestExecutor {
    pub fn new(policy: RetryPolicy, default_timeout: Duration) -> Self {
        Self {
            policy,
            default_timeout,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Execute `op` until it succeeds, fails with a non-retryable error,
    /// or `max_attempts` is exhausted.
    ///
    /// Each attempt is bounded by `timeout` (or the executor default); an
    /// attempt that overruns becomes [`Error::Timeout`]. The retry budget
    /// is independent of the per-attempt timeout.
    pub async fn execute<T, F, Fut>(
        &self,
        label: &str,
        timeout: Option<Duration>,
        mut op: F,
    ) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let timeout = timeout.unwrap_or(self.default_timeout);
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let result = match tokio::time::timeout(timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout {
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                }),
            };

            let err = match result {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_retryable() {
                debug!(label, attempt, error = %err, "request failed, not retryable");
                return Err(err);
            }
            if attempt >= max_attempts {
                warn!(label, attempts = attempt, error = %err, "request failed, retries exhausted");
                return Err(err);
            }

            let delay = self.policy.next_delay(attempt);
            warn!(
                label,
                attempt,
                max_attempts,
                delay_ms = delay.as_millis(),
                error = %err,
                "transient failure, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
