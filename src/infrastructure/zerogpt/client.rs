use anyhow::{Context, Result};
use reqwest::Client as ReqwestClient;
use serde_json::Value;
use std::time::Duration;
use tracing::instrument;

use super::errors::ZeroGptError;
use super::types::DetectTextRequest;
use crate::domain::models::config::{DetectorConfig, RateLimitConfig, RetryConfig};
use crate::infrastructure::http::{RetryPolicy, TokenBucketRateLimiter};

/// Configuration for the ZeroGPT HTTP client
#[derive(Debug, Clone)]
pub struct ZeroGptClientConfig {
    /// RapidAPI key
    pub api_key: String,
    /// Service root, without trailing slash
    pub base_url: String,
    /// Value of the `X-RapidAPI-Host` header
    pub host: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Requests per second allowed by the limiter
    pub rate_limit_rps: f64,
    /// Backoff for transient failures
    pub retry: RetryConfig,
}

impl ZeroGptClientConfig {
    /// Assemble client settings from the loaded configuration sections
    pub fn from_sections(
        api_key: String,
        detector: &DetectorConfig,
        retry: &RetryConfig,
        rate_limit: &RateLimitConfig,
    ) -> Self {
        Self {
            api_key,
            base_url: detector.base_url.trim_end_matches('/').to_string(),
            host: detector.host.clone(),
            timeout_secs: detector.timeout_secs,
            rate_limit_rps: rate_limit.requests_per_second,
            retry: retry.clone(),
        }
    }
}

/// HTTP client for the ZeroGPT detector on RapidAPI
pub struct ZeroGptClient {
    http_client: ReqwestClient,
    api_key: String,
    base_url: String,
    host: String,
    rate_limiter: TokenBucketRateLimiter,
    retry_policy: RetryPolicy,
}

impl std::fmt::Debug for ZeroGptClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZeroGptClient")
            .field("base_url", &self.base_url)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl ZeroGptClient {
    /// Build the client; fails only if the HTTP client cannot be constructed
    pub fn with_config(config: ZeroGptClientConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            api_key: config.api_key,
            base_url: config.base_url,
            host: config.host,
            rate_limiter: TokenBucketRateLimiter::new(config.rate_limit_rps),
            retry_policy: RetryPolicy::from_config(&config.retry),
        })
    }

    async fn send_request(&self, request: &DetectTextRequest) -> Result<Value, ZeroGptError> {
        let response = self
            .http_client
            .post(format!("{}/api/v1/detectText", self.base_url))
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.host)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(ZeroGptError::from_status(status, &body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ZeroGptError::Decode(e.to_string()))
    }

    /// Submit text for detection and return the decoded response body
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn detect_text(&self, text: &str) -> Result<Value, ZeroGptError> {
        let request = DetectTextRequest {
            input_text: text.to_string(),
        };

        self.rate_limiter.acquire().await;
        self.retry_policy
            .execute(|| self.send_request(&request))
            .await
    }
}
