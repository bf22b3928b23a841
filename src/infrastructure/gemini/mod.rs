//! Gemini API client
//!
//! Thin HTTP client for the `generateContent` endpoint with rate limiting,
//! retry of transient failures, and classified errors.

pub mod client;
pub mod errors;
pub mod types;

pub use client::{GeminiClient, GeminiClientConfig};
pub use errors::GeminiApiError;
pub use types::{GenerateContentRequest, GenerateContentResponse, GenerationConfig};
