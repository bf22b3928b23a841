use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Token bucket rate limiter for API request throttling
///
/// Capacity equals the refill rate, so a fresh limiter allows one second's
/// worth of requests in a burst. Fractional rates below 1.0 still allow a
/// single immediate request.
#[derive(Clone, Debug)]
pub struct TokenBucketRateLimiter {
    state: Arc<Mutex<Bucket>>,
    /// Maximum token capacity
    capacity: f64,
    /// Tokens added per second
    refill_rate: f64,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucketRateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `rate_limit_rps` - Requests per second allowed; non-positive values are
    ///   rejected by the config validator before reaching here
    pub fn new(rate_limit_rps: f64) -> Self {
        let capacity = rate_limit_rps.max(1.0);
        Self {
            state: Arc::new(Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            })),
            capacity,
            refill_rate: rate_limit_rps.max(f64::MIN_POSITIVE),
        }
    }

    /// Acquire a token from the bucket, waiting if necessary
    ///
    /// The lock is released while sleeping so other tasks are not blocked.
    pub async fn acquire(&self) {
        loop {
            let wait_duration = {
                let mut bucket = self.state.lock().await;

                let now = Instant::now();
                let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
                let new_tokens = elapsed.mul_add(self.refill_rate, bucket.tokens).min(self.capacity);

                if new_tokens >= 1.0 {
                    bucket.tokens = new_tokens - 1.0;
                    bucket.last_refill = now;
                    return;
                }

                let tokens_needed = 1.0 - new_tokens;
                Duration::from_secs_f64((tokens_needed / self.refill_rate).max(0.01))
            };

            sleep(wait_duration).await;
        }
    }

    /// Get the current number of available tokens (for testing/monitoring)
    pub async fn available_tokens(&self) -> f64 {
        let bucket = self.state.lock().await;
        let elapsed = bucket.last_refill.elapsed().as_secs_f64();
        elapsed
            .mul_add(self.refill_rate, bucket.tokens)
            .min(self.capacity)
    }
}
