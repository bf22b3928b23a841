//! ZeroGPT detection client (RapidAPI)

pub mod client;
pub mod errors;
pub mod types;

pub use client::{ZeroGptClient, ZeroGptClientConfig};
pub use errors::ZeroGptError;
pub use types::{response_message, DetectTextRequest, DetectionScores};
