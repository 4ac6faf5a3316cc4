use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio_retry::Retry;
use tokio_retry::strategy::ExponentialBackoff;

/// Exponential backoff with jitter.
///
/// The n-th retry (zero based) waits `first_backoff * 2^n`, capped at `max_backoff`,
/// then shifted by a random offset of up to `jitter * delay` in either direction.
/// The shifted delay never leaves `[first_backoff, max_backoff]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub first_backoff: Duration,
    pub max_backoff: Duration,
    pub jitter: f64,
}

impl RetryPolicy {
    pub fn backoff(max_retries: u32, first_backoff: Duration) -> Self {
        Self {
            max_retries,
            first_backoff,
            max_backoff: Duration::from_secs(10),
            jitter: 0.5,
        }
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    // NaN and out-of-range values collapse into [0, 1]
    fn effective_jitter(&self) -> f64 {
        if self.jitter.is_finite() {
            self.jitter.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn jittered(&self, base: Duration) -> Duration {
        let jitter = self.effective_jitter();
        if jitter == 0.0 {
            return base;
        }
        let spread = base.mul_f64(jitter);
        let lower = base.saturating_sub(spread).max(self.first_backoff);
        let upper = base.saturating_add(spread).min(self.max_backoff);
        if lower >= upper {
            return upper;
        }
        let nanos = rand::thread_rng().gen_range(lower.as_nanos() as u64..=upper.as_nanos() as u64);
        Duration::from_nanos(nanos)
    }

    /// Delays to wait before each retry, `max_retries` of them.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        // from_millis(2).factor(f) yields f * 2^(n+1) ms; halving gives first_backoff * 2^n
        let first_ms = self.first_backoff.as_millis().min(u64::MAX as u128) as u64;
        ExponentialBackoff::from_millis(2)
            .factor(first_ms)
            .map(|d| (d / 2).min(self.max_backoff))
            .map(|d| self.jittered(d))
            .take(self.max_retries as usize)
    }
}

/// Bounded lookup against a remote dependency: per-attempt timeout plus retries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallPolicy {
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

/// Runs `op` until it succeeds or the policy's retries are spent; returns the last error.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let delays: Vec<Duration> = policy.delays().collect();
    let mut attempt = 0u32;
    Retry::spawn(delays, || {
        attempt += 1;
        let n = attempt;
        let fut = op();
        async move {
            fut.await.map_err(|e| {
                tracing::debug!(attempt = n, error = %e, "attempt_failed");
                e
            })
        }
    })
    .await
}
