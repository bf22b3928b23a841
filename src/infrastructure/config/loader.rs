use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Target score outside [0, 100]
    #[error("Invalid target_score: {0}. Must be between 0 and 100")]
    InvalidTargetScore(f64),

    /// Non-positive requests per second
    #[error("Invalid rate limit: {0}. Must be positive")]
    InvalidRateLimit(f64),

    /// Unknown log level
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown log format
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// Zero retries configured
    #[error("Invalid max_retries: {0}. Cannot be 0")]
    InvalidMaxRetries(u32),

    /// Initial backoff not below the cap
    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    /// Temperature outside [0, 2]
    #[error("Invalid temperature: {0}. Must be between 0.0 and 2.0")]
    InvalidTemperature(f64),

    /// Negative word-count tolerance
    #[error("Invalid word_count_tolerance: {0}. Cannot be negative")]
    InvalidTolerance(f64),

    /// Any other invalid setting
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Environment variables consulted for the rewriter key, in order.
const REWRITER_KEY_VARS: [&str; 2] = ["GEMINI_KEY", "GEMINI_API_KEY"];

/// Environment variables consulted for the detector key, in order.
const DETECTOR_KEY_VARS: [&str; 2] = ["RAPIDAPI_KEY", "ZEROGPT_API_KEY"];

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .humanizer/config.yaml (project config)
    /// 3. .humanizer/local.yaml (local overrides, optional)
    /// 4. Environment variables (HUMANIZER_* prefix, highest priority)
    ///
    /// API keys missing after the merge are taken from the provider
    /// environment variables once, here, and never re-read later.
    pub fn load() -> Result<Config> {
        let mut config: Config = Self::base_figment()
            .merge(Yaml::file(".humanizer/config.yaml"))
            .merge(Yaml::file(".humanizer/local.yaml"))
            .merge(Env::prefixed("HUMANIZER_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::resolve_credentials(&mut config);
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring environment overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let mut config: Config = Self::base_figment()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("HUMANIZER_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::resolve_credentials(&mut config);
        Self::validate(&config)?;
        Ok(config)
    }

    fn base_figment() -> Figment {
        Figment::new().merge(Serialized::defaults(Config::default()))
    }

    /// Fill absent API keys from the conventional environment variables
    pub fn resolve_credentials(config: &mut Config) {
        if config.rewriter.api_key.is_none() {
            config.rewriter.api_key = first_env(&REWRITER_KEY_VARS);
        }
        if config.detector.api_key.is_none() {
            config.detector.api_key = first_env(&DETECTOR_KEY_VARS);
        }
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let target = config.humanization.target_score;
        if !target.is_finite() || !(0.0..=100.0).contains(&target) {
            return Err(ConfigError::InvalidTargetScore(target));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.rate_limit.requests_per_second <= 0.0 {
            return Err(ConfigError::InvalidRateLimit(
                config.rate_limit.requests_per_second,
            ));
        }

        if config.retry.max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(config.retry.max_retries));
        }

        if config.retry.initial_backoff_ms >= config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        if !(0.0..=2.0).contains(&config.rewriter.temperature) {
            return Err(ConfigError::InvalidTemperature(config.rewriter.temperature));
        }

        if config.quality.word_count_tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(
                config.quality.word_count_tolerance,
            ));
        }

        if config.rewriter.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "rewriter model cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}
