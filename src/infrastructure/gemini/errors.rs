use reqwest::StatusCode;
use thiserror::Error;

use crate::infrastructure::http::TransientError;
use crate::infrastructure::logging::scrub;

/// Errors that can occur when interacting with the Gemini API
#[derive(Error, Debug)]
pub enum GeminiApiError {
    /// Invalid request parameters or malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed due to invalid or missing API key
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Model name not recognised by the API
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Rate limit or quota exceeded, retry after waiting
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// API server encountered an internal error
    #[error("API server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Network error occurred during request
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out waiting for response
    #[error("Timeout waiting for response")]
    Timeout,

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The prompt was rejected by the safety filters
    #[error("Prompt blocked: {0}")]
    Blocked(String),

    /// The response contained no text
    #[error("Response contained no text (finish reason: {0})")]
    EmptyResponse(String),

    /// Unknown error occurred
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl GeminiApiError {
    /// Create error from HTTP status code and response body
    ///
    /// - 400: Invalid request
    /// - 401, 403: Authentication failed
    /// - 404: Model not found
    /// - 429: Rate limit exceeded
    /// - 5xx: Server error
    /// - Other: Unknown error
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = scrub(body);
        match status.as_u16() {
            400 => Self::InvalidRequest(body),
            401 | 403 => Self::AuthenticationFailed(body),
            404 => Self::ModelNotFound(body),
            429 => Self::RateLimitExceeded,
            500..=599 => Self::ServerError(status, body),
            _ => Self::Unknown(format!("HTTP {status}: {body}")),
        }
    }
}

impl From<reqwest::Error> for GeminiApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(scrub(&err.to_string()))
        } else {
            Self::NetworkError(scrub(&err.to_string()))
        }
    }
}

impl TransientError for GeminiApiError {
    /// Rate limits, 5xx, timeouts and network failures are retried
    fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded | Self::ServerError(..) | Self::Timeout | Self::NetworkError(_)
        )
    }
}
