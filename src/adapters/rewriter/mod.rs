//! Rewriter port implementations.

pub mod gemini;
pub mod prompt;
pub mod scripted;

pub use gemini::GeminiRewriter;
pub use scripted::ScriptedRewriter;
