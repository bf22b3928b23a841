//! HTTP plumbing shared by the external service clients.

pub mod rate_limiter;
pub mod retry;

pub use rate_limiter::TokenBucketRateLimiter;
pub use retry::{RetryPolicy, TransientError};
