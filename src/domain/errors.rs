//! Domain errors for the humanization pipeline.

use thiserror::Error;

/// Errors surfaced by a humanization invocation.
///
/// Detector faults never appear here: the detector port absorbs them and
/// reports a degraded score instead.
#[derive(Debug, Error)]
pub enum HumanizeError {
    /// Budget or target rejected before any collaborator call
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The rewriter produced no output; the invocation is aborted
    #[error("Rewrite failed: {0}")]
    RewriteFailure(#[from] RewriteError),

    /// The run timeout expired; no partial result is kept
    #[error("Humanization timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl HumanizeError {
    /// Short machine-readable name of the failure kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArguments(_) => "InvalidArguments",
            Self::RewriteFailure(_) => "RewriteFailure",
            Self::Timeout(_) => "Timeout",
        }
    }
}

/// Errors raised by a rewriter when it cannot produce output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RewriteError {
    /// No rewriter API key was configured
    #[error("no API key configured for the rewriter")]
    MissingCredentials,

    /// The model answered with nothing usable
    #[error("rewriter returned empty output")]
    EmptyOutput,

    /// The API call failed after retries
    #[error("rewriter API error: {0}")]
    Api(String),
}

/// Errors raised while generating a thesis or extracting its citations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// No generator API key was configured
    #[error("no API key configured for generation")]
    MissingCredentials,

    /// The model answered with nothing usable
    #[error("generator returned empty output")]
    EmptyOutput,

    /// The API call failed after retries
    #[error("generator API error: {0}")]
    Api(String),
}

impl GenerationError {
    /// Short machine-readable name of the failure kind.
    pub const fn kind(&self) -> &'static str {
        "GenerationFailure"
    }
}

/// Result alias for humanization operations.
pub type HumanizeResult<T> = Result<T, HumanizeError>;
