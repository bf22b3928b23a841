//! Port implementations for the external collaborators.

pub mod detector;
pub mod generation;
pub mod rewriter;

pub use detector::{ScriptedDetector, ZeroGptDetector};
pub use generation::GeminiGenerator;
pub use rewriter::{GeminiRewriter, ScriptedRewriter};
