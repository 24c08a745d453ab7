//! Retry policies for fetch operations.

use std::future::Future;
use std::time::Duration;

/// Retry policy: a bounded number of attempts with a fixed pause between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Pause after each failed attempt.
    pub delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` tries with the default one-second pause.
    pub fn new(max_attempts: u32) -> Self {
        Self::fixed(max_attempts, Duration::from_secs(1))
    }

    /// `max_attempts` tries with a fixed pause.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Whether another attempt follows a failure of `attempt` (0-indexed).
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy's attempts are exhausted. The last error is returned.
///
/// `op` receives the 0-indexed attempt number.
///
/// # Example
///
/// ```rust,ignore
/// let page = attempt(&RetryPolicy::default(), |_| fetch_page(1), LoadError::is_retryable).await?;
/// ```
pub async fn attempt<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut op: F,
    is_retryable: impl Fn(&E) -> bool,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut n = 0;
    loop {
        match op(n).await {
            Ok(value) => return Ok(value),
            Err(e) if is_retryable(&e) && policy.should_retry(n) => {
                let delay = policy.delay;
                tracing::warn!(
                    attempt = n + 1,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                n += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
