//! CLI command implementations.

pub mod config;
pub mod detect;
pub mod extract_citations;
pub mod generate;
pub mod humanize;
pub mod validate;
