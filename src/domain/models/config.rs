use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::humanization::{DEFAULT_MAX_ITERATIONS, DEFAULT_TARGET_SCORE};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Loop defaults and pacing
    #[serde(default)]
    pub humanization: HumanizationConfig,

    /// Text rewriter (Gemini) configuration
    #[serde(default)]
    pub rewriter: RewriterConfig,

    /// Humanness detector (ZeroGPT) configuration
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Thesis validation configuration
    #[serde(default)]
    pub quality: QualityConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Humanization loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HumanizationConfig {
    /// Rewrite attempts when the request does not specify one
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Target human percentage when the request does not specify one
    #[serde(default = "default_target_score")]
    pub target_score: f64,

    /// Pause between iterations, 0 disables it
    #[serde(default = "default_inter_iteration_delay_ms")]
    pub inter_iteration_delay_ms: u64,

    /// Stop after this many consecutive non-improving iterations (disabled when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagnation_limit: Option<u32>,

    /// Wall-clock limit for a whole invocation (unlimited when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_timeout_secs: Option<u64>,
}

const fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

const fn default_target_score() -> f64 {
    DEFAULT_TARGET_SCORE
}

const fn default_inter_iteration_delay_ms() -> u64 {
    1000
}

impl HumanizationConfig {
    /// Delay as a `Duration`
    pub const fn inter_iteration_delay(&self) -> Duration {
        Duration::from_millis(self.inter_iteration_delay_ms)
    }

    /// Timeout as a `Duration`, if set
    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for HumanizationConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            target_score: default_target_score(),
            inter_iteration_delay_ms: default_inter_iteration_delay_ms(),
            stagnation_limit: None,
            run_timeout_secs: None,
        }
    }
}

/// Gemini rewriter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RewriterConfig {
    /// API key (falls back to GEMINI_KEY / GEMINI_API_KEY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model to use
    #[serde(default = "default_rewriter_model")]
    pub model: String,

    /// Base URL for API (for testing/proxies)
    #[serde(default = "default_rewriter_base_url")]
    pub base_url: String,

    /// Sampling temperature (0.0 to 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens to generate
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_rewriter_timeout")]
    pub timeout_secs: u64,
}

fn default_rewriter_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_rewriter_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

const fn default_temperature() -> f64 {
    0.7
}

const fn default_max_output_tokens() -> u32 {
    65536
}

const fn default_rewriter_timeout() -> u64 {
    600
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_rewriter_model(),
            base_url: default_rewriter_base_url(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_rewriter_timeout(),
        }
    }
}

/// ZeroGPT detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DetectorConfig {
    /// RapidAPI key (falls back to RAPIDAPI_KEY / ZEROGPT_API_KEY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL for API (for testing/proxies)
    #[serde(default = "default_detector_base_url")]
    pub base_url: String,

    /// Value of the X-RapidAPI-Host header
    #[serde(default = "default_detector_host")]
    pub host: String,

    /// Request timeout in seconds
    #[serde(default = "default_detector_timeout")]
    pub timeout_secs: u64,
}

fn default_detector_base_url() -> String {
    "https://zerogpt.p.rapidapi.com".to_string()
}

fn default_detector_host() -> String {
    "zerogpt.p.rapidapi.com".to_string()
}

const fn default_detector_timeout() -> u64 {
    60
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_detector_base_url(),
            host: default_detector_host(),
            timeout_secs: default_detector_timeout(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    1000
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateLimitConfig {
    /// Requests per second allowed per external service
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,
}

const fn default_requests_per_second() -> f64 {
    1.0
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
        }
    }
}

/// Thesis validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QualityConfig {
    /// Allowed overshoot of the target word count (0.10 = 10%)
    #[serde(default = "default_word_count_tolerance")]
    pub word_count_tolerance: f64,
}

const fn default_word_count_tolerance() -> f64 {
    0.10
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            word_count_tolerance: default_word_count_tolerance(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rotated log files (stderr only when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
