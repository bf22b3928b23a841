use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::models::DegradedReason;
use crate::infrastructure::http::TransientError;
use crate::infrastructure::logging::scrub;

/// Errors that can occur when calling the ZeroGPT API
#[derive(Error, Debug)]
pub enum ZeroGptError {
    /// Request could not be sent or the connection dropped
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out waiting for response
    #[error("Timeout waiting for response")]
    Timeout,

    /// Service answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Body was not valid JSON
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ZeroGptError {
    /// Classify a non-success response; the body is scrubbed of secrets
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        Self::Status {
            status,
            body: scrub(body),
        }
    }

    /// Degraded reason recorded when this error triggers the fail-open score
    pub fn degraded_reason(&self) -> DegradedReason {
        match self {
            Self::Network(message) => DegradedReason::Transport(message.clone()),
            Self::Timeout => DegradedReason::Transport("timeout".to_string()),
            Self::Status { status, .. } => DegradedReason::HttpStatus(status.as_u16()),
            Self::Decode(message) => DegradedReason::MalformedResponse(message.clone()),
        }
    }
}

impl From<reqwest::Error> for ZeroGptError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(scrub(&err.to_string()))
        }
    }
}

impl TransientError for ZeroGptError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            Self::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_statuses() {
        assert!(ZeroGptError::from_status(StatusCode::TOO_MANY_REQUESTS, "").is_transient());
        assert!(ZeroGptError::from_status(StatusCode::BAD_GATEWAY, "").is_transient());
        assert!(!ZeroGptError::from_status(StatusCode::UNAUTHORIZED, "").is_transient());
        assert!(!ZeroGptError::Decode("eof".to_string()).is_transient());
        assert!(ZeroGptError::Timeout.is_transient());
    }

    #[test]
    fn test_degraded_reason_mapping() {
        assert_eq!(
            ZeroGptError::from_status(StatusCode::FORBIDDEN, "no").degraded_reason(),
            DegradedReason::HttpStatus(403)
        );
        assert_eq!(
            ZeroGptError::Decode("bad json".to_string()).degraded_reason(),
            DegradedReason::MalformedResponse("bad json".to_string())
        );
        assert!(matches!(
            ZeroGptError::Timeout.degraded_reason(),
            DegradedReason::Transport(_)
        ));
    }
}
