use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::models::config::RetryConfig;

/// Errors that know whether a retry could help
pub trait TransientError: Display {
    /// Returns true if this error is transient and should be retried
    fn is_transient(&self) -> bool;
}

/// Exponential backoff for outbound HTTP calls.
///
/// Backoff doubles with each retry and is capped at `max_backoff_ms`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Initial backoff duration in milliseconds
    initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds
    max_backoff_ms: u64,
}

impl RetryPolicy {
    /// `max_retries` of 0 disables retrying.
    pub const fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// A policy that never retries
    pub const fn none() -> Self {
        Self::new(0, 0, 0)
    }

    /// Policy from the `retry` config section
    pub const fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            config.initial_backoff_ms,
            config.max_backoff_ms,
        )
    }

    /// Run `operation`, retrying transient failures with exponential backoff.
    ///
    /// Permanent errors return immediately; a transient error is returned
    /// once the retry budget is spent.
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: TransientError,
    {
        let mut attempt = 0;

        loop {
            let err = match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!(retries = attempt, "Request recovered after retry");
                    }
                    return Ok(result);
                }
                Err(err) => err,
            };

            if !self.should_retry(&err, attempt) {
                if err.is_transient() {
                    warn!(attempts = attempt + 1, error = %err, "Giving up after retries");
                } else {
                    debug!(error = %err, "Permanent error, not retrying");
                }
                return Err(err);
            }

            let backoff = self.calculate_backoff(attempt);
            warn!(
                attempt = attempt + 1,
                max_retries = self.max_retries,
                ?backoff,
                error = %err,
                "Transient error, backing off"
            );
            sleep(backoff).await;
            attempt += 1;
        }
    }

    /// Calculate exponential backoff duration for a given attempt
    ///
    /// Formula: min(initial_backoff * 2^attempt, max_backoff)
    fn calculate_backoff(&self, attempt: u32) -> Duration {
        let backoff_ms = self
            .initial_backoff_ms
            .saturating_mul(2_u64.saturating_pow(attempt))
            .min(self.max_backoff_ms);

        Duration::from_millis(backoff_ms)
    }

    fn should_retry<E: TransientError>(&self, error: &E, attempt: u32) -> bool {
        if attempt >= self.max_retries {
            return false;
        }

        error.is_transient()
    }
}

impl Default for RetryPolicy {
    /// 3 retries, 1s initial backoff, 30s cap
    fn default() -> Self {
        Self::new(3, 1_000, 30_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    enum TestError {
        Busy,
        Rejected,
    }

    impl Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Busy => write!(f, "busy"),
                Self::Rejected => write!(f, "rejected"),
            }
        }
    }

    impl TransientError for TestError {
        fn is_transient(&self) -> bool {
            matches!(self, Self::Busy)
        }
    }

    #[test]
    fn test_backoff_calculation() {
        let policy = RetryPolicy::new(5, 1000, 60000);

        assert_eq!(policy.calculate_backoff(0), Duration::from_millis(1000));
        assert_eq!(policy.calculate_backoff(1), Duration::from_millis(2000));
        assert_eq!(policy.calculate_backoff(2), Duration::from_millis(4000));
        assert_eq!(policy.calculate_backoff(5), Duration::from_millis(32000));
        assert_eq!(policy.calculate_backoff(6), Duration::from_millis(60000));
    }

    #[test]
    fn test_should_not_retry_after_max_attempts() {
        let policy = RetryPolicy::new(3, 1000, 60000);

        assert!(policy.should_retry(&TestError::Busy, 2));
        assert!(!policy.should_retry(&TestError::Busy, 3));
        assert!(!policy.should_retry(&TestError::Rejected, 0));
    }

    #[tokio::test]
    async fn test_execute_retries_on_transient_error() {
        let policy = RetryPolicy::new(3, 1, 10);
        let call_count = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute(|| {
                let count = Arc::clone(&call_count);
                async move {
                    let attempt = count.fetch_add(1, Ordering::SeqCst);
                    if attempt < 2 {
                        Err(TestError::Busy)
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_execute_fails_on_permanent_error() {
        let policy = RetryPolicy::new(3, 1, 10);
        let call_count = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = policy
            .execute(|| {
                let count = Arc::clone(&call_count);
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    Err(TestError::Rejected)
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_execute_fails_after_max_retries() {
        let policy = RetryPolicy::new(2, 1, 10);
        let call_count = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = policy
            .execute(|| {
                let count = Arc::clone(&call_count);
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    Err(TestError::Busy)
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(call_count.load(Ordering::SeqCst), 3); // Initial + 2 retries
    }

    #[tokio::test]
    async fn test_none_policy_calls_once() {
        let call_count = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = RetryPolicy::none()
            .execute(|| {
                let count = Arc::clone(&call_count);
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    Err(TestError::Busy)
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }
}
