//! Infrastructure layer
//!
//! External integrations and process plumbing:
//! - Shared HTTP retry and rate limiting
//! - Gemini API client
//! - ZeroGPT API client
//! - Configuration loading
//! - Logging setup and secret scrubbing

pub mod config;
pub mod gemini;
pub mod http;
pub mod logging;
pub mod zerogpt;
