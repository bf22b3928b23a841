//! Domain layer for the thesis humanizer
//!
//! Core models, collaborator ports and error types. Nothing in here
//! performs I/O.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{GenerationError, HumanizeError, HumanizeResult, RewriteError};
