//! Port trait definitions (Hexagonal Architecture)
//!
//! The humanization loop depends only on these traits:
//! - Rewriter: paraphrasing collaborator (Gemini in production)
//! - Detector: humanness scoring collaborator (ZeroGPT in production)
//!
//! The generation pipeline uses ThesisWriter and CitationExtractor.

pub mod detector;
pub mod generation;
pub mod rewriter;

pub use detector::Detector;
pub use generation::{CitationExtractor, ThesisWriter};
pub use rewriter::Rewriter;
