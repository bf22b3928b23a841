//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading
//! - Environment variable overrides
//! - One-time credential resolution
//! - Configuration validation

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
