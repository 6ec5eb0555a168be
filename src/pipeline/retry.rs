//! Bounded exponential backoff for transient dependency failures.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Minimum 1.
    pub attempts: u32,
    /// Delay before the second attempt; doubles each retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay,
        }
    }

    /// No retries; every error surfaces immediately.
    pub fn none() -> Self {
        Self {
            attempts: 1,
            base_delay: Duration::ZERO,
        }
    }
}

/// Runs `op` until it succeeds, the error is not transient, or the attempt
/// budget is spent. The last error is returned unchanged.
pub async fn with_retry<T, E, Fut, Op, IsTransient>(
    policy: RetryPolicy,
    label: &str,
    mut op: Op,
    is_transient: IsTransient,
) -> Result<T, E>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    IsTransient: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut delay = policy.base_delay;

    for attempt in 1..=policy.attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.attempts && is_transient(&e) => {
                warn!(
                    label,
                    attempt,
                    max_attempts = policy.attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient failure, backing off"
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
            }
            Err(e) => return Err(e),
        }
    }

    unreachable!("retry loop always returns within the attempt budget")
}
