//! Thesis writer and citation extractor implementations.

pub mod gemini;
pub mod prompt;

pub use gemini::GeminiGenerator;
