//! Retry policy for flaky RPC calls
//!
//! Only failures that look transient (the message mentions a timeout or a
//! connection error) are retried. Everything else is returned to the caller
//! untouched on the first attempt.

use crate::config::RetryConfig;
use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// Default attempt budget
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay; attempt `n` waits `n * DEFAULT_INITIAL_DELAY`
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// Linear-backoff retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy. A budget of zero is treated as a single attempt.
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Delay slept after failed attempt `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_delay.saturating_mul(attempt)
    }

    /// Run `operation` until it succeeds, fails non-transiently, or the
    /// attempt budget is spent.
    ///
    /// # Arguments
    /// * `context` - Label used in log lines and in `Error::RetryExhausted`
    /// * `operation` - Produces a fresh future for every attempt
    pub async fn run<T, F, Fut>(&self, context: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !is_transient(&err) {
                return Err(err);
            }

            if attempt >= self.max_attempts {
                error!(
                    context = %context,
                    attempts = self.max_attempts,
                    error = %err,
                    "Operation failed after exhausting retries"
                );
                return Err(Error::RetryExhausted {
                    context: context.to_string(),
                    attempts: self.max_attempts,
                    source: Box::new(err),
                });
            }

            let delay = self.delay_for(attempt);
            warn!(
                context = %context,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Transient failure, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_INITIAL_DELAY)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.initial_delay_ms),
        )
    }
}

/// Run `operation` under the default policy (3 attempts, 1s linear backoff)
pub async fn with_retry<T, F, Fut>(operation: F, context: &str) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    RetryPolicy::default().run(context, operation).await
}

/// Whether a failure is worth another attempt
pub fn is_transient(err: &Error) -> bool {
    let message = err.to_string().to_lowercase();
    message.contains("timeout") || message.contains("connectionerror")
}
