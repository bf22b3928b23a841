pub mod citation;
pub mod config;
pub mod detection;
pub mod generation;
pub mod humanization;
pub mod validation;

pub use citation::{extract_citation_markers, missing_markers, Citation, CitationSet};
pub use config::{
    Config, DetectorConfig, HumanizationConfig, LoggingConfig, QualityConfig, RateLimitConfig,
    RetryConfig, RewriterConfig,
};
pub use detection::{DegradedReason, DetectionReport, DetectionStatus, FAIL_OPEN_HUMAN_PERCENTAGE};
pub use generation::{
    ExtractionRequest, GenerationRequest, GenerationResult, DEFAULT_CITATION_STYLE,
    DEFAULT_TARGET_WORDS,
};
pub use humanization::{
    Candidate, FinalScore, HistoryEntry, HumanizationParams, HumanizationRequest,
    HumanizationResult, StopReason, DEFAULT_MAX_ITERATIONS, DEFAULT_TARGET_SCORE,
};
pub use validation::{ThesisSpecifications, ValidationReport, ValidationRequest};
