//! Thesis humanizer
//!
//! Rewrites generated academic text in a feedback loop with an AI-text
//! detector until it reads as human-written, keeping the best candidate
//! seen and every citation marker intact.
//!
//! Layers:
//! - `domain`: models, collaborator ports and errors
//! - `infrastructure`: HTTP clients, configuration and logging
//! - `adapters`: port implementations (Gemini, ZeroGPT, scripted doubles)
//! - `services`: the humanization loop, the generation pipeline and the
//!   quality checker
//! - `cli`: command-line entry points

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use adapters::{GeminiGenerator, GeminiRewriter, ScriptedDetector, ScriptedRewriter, ZeroGptDetector};
pub use domain::errors::{GenerationError, HumanizeError, RewriteError};
pub use domain::models::{
    Citation, CitationSet, DetectionReport, HumanizationParams, HumanizationResult, StopReason,
};
pub use domain::ports::{CitationExtractor, Detector, Rewriter, ThesisWriter};
pub use services::{GenerationPipeline, HumanizationLoop, LoopSettings, QualityChecker};
